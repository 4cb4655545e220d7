use crate::{IngestError, LoadSummary};
use chrono::NaiveDate;
use csv::{ReaderBuilder, StringRecord};
use shared::model::{Airline, Airport, Route};
use std::collections::HashMap;
use std::io::Read;

/// Markers the source files use for "no value".
fn clean(field: &str) -> Option<&str> {
    let field = field.trim().trim_matches('"');
    match field {
        "" | "\\N" | "NULL" | "-" => None,
        other => Some(other),
    }
}

fn parse_opt<T: std::str::FromStr>(field: &str) -> Result<Option<T>, String> {
    clean(field)
        .map(|f| f.parse::<T>().map_err(|_| format!("invalid value {f:?}")))
        .transpose()
}

fn parse_req<T: std::str::FromStr>(field: &str, column: &str) -> Result<T, String> {
    parse_opt(field)?.ok_or_else(|| format!("missing {column}"))
}

/// Header lookup for the headered files. Required columns are resolved
/// once up front so a missing header is a file-level error, never a
/// per-row one.
struct Columns {
    index: HashMap<String, usize>,
    file: &'static str,
}

impl Columns {
    fn new(headers: &StringRecord, file: &'static str) -> Self {
        let index = headers
            .iter()
            .enumerate()
            .map(|(i, h)| (h.trim().to_string(), i))
            .collect();
        Self { index, file }
    }

    fn required(&self, name: &str) -> Result<usize, IngestError> {
        self.index
            .get(name)
            .copied()
            .ok_or_else(|| IngestError::MissingColumn {
                file: self.file,
                column: name.to_string(),
            })
    }

    fn optional(&self, name: &str) -> Option<usize> {
        self.index.get(name).copied()
    }
}

fn field<'r>(record: &'r StringRecord, i: usize) -> &'r str {
    record.get(i).unwrap_or_default()
}

fn opt_field<'r>(record: &'r StringRecord, i: Option<usize>) -> Option<&'r str> {
    i.and_then(|i| record.get(i)).and_then(clean)
}

/// Read the headerless airports `.dat` file (comma separated, `\N` nulls).
/// A leading header row, detected by a non-numeric first field, is skipped
/// the way the upstream dataset ships it.
pub fn read_airports<R: Read>(input: R) -> Result<(Vec<Airport>, LoadSummary), IngestError> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .from_reader(input);

    let mut airports = Vec::new();
    let mut summary = LoadSummary::new("airports.dat");
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        if row == 0 && parse_opt::<i32>(field(&record, 0)).is_err() {
            continue;
        }
        match parse_airport(&record) {
            Ok(airport) => {
                airports.push(airport);
                summary.loaded += 1;
            }
            Err(e) => summary.push_error(row + 1, e),
        }
    }
    Ok((airports, summary))
}

fn parse_airport(record: &StringRecord) -> Result<Airport, String> {
    if record.len() < 8 {
        return Err("insufficient columns".to_string());
    }
    Ok(Airport {
        id: parse_req(field(record, 0), "id")?,
        name: clean(field(record, 1)).unwrap_or_default().to_string(),
        city: clean(field(record, 2)).unwrap_or_default().to_string(),
        country: clean(field(record, 3)).ok_or("missing country")?.to_string(),
        code: clean(field(record, 4)).map(str::to_string),
        latitude: parse_opt(field(record, 5))?,
        longitude: parse_opt(field(record, 6))?,
        // some rows carry altitude as a float
        altitude: parse_opt::<f64>(field(record, 7))?.map(|a| a as i32),
        utc_offset: record.get(8).map(parse_opt).transpose()?.flatten(),
        continent: record.get(9).and_then(clean).map(str::to_string),
        timezone: record.get(10).and_then(clean).map(str::to_string),
    })
}

/// Read the headered airlines CSV (`IDAerolinea`, `NombreAerolinea`, ...).
/// `Alias`, `ICAO` and `Callsign` are absent from older exports and stay
/// optional.
pub fn read_airlines<R: Read>(input: R) -> Result<(Vec<Airline>, LoadSummary), IngestError> {
    let mut reader = ReaderBuilder::new().flexible(true).from_reader(input);
    let columns = Columns::new(reader.headers()?, "airlines.csv");
    let id_col = columns.required("IDAerolinea")?;
    let name_col = columns.required("NombreAerolinea")?;
    let iata_col = columns.required("IATA")?;
    let country_col = columns.required("Pais")?;
    let active_col = columns.required("Activa")?;
    let alias_col = columns.optional("Alias");
    let icao_col = columns.optional("ICAO");
    let callsign_col = columns.optional("Callsign");

    let mut airlines = Vec::new();
    let mut summary = LoadSummary::new("airlines.csv");
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        let parsed = (|| -> Result<Airline, String> {
            Ok(Airline {
                id: parse_req(field(&record, id_col), "IDAerolinea")?,
                name: clean(field(&record, name_col))
                    .ok_or("missing NombreAerolinea")?
                    .to_string(),
                alias: opt_field(&record, alias_col).map(str::to_string),
                iata_code: clean(field(&record, iata_col)).map(str::to_string),
                icao_code: opt_field(&record, icao_col).map(str::to_string),
                callsign: opt_field(&record, callsign_col).map(str::to_string),
                country: clean(field(&record, country_col)).map(str::to_string),
                active: clean(field(&record, active_col))
                    .map(|a| a.eq_ignore_ascii_case("Y"))
                    .unwrap_or(true),
            })
        })();
        match parsed {
            Ok(airline) => {
                airlines.push(airline);
                summary.loaded += 1;
            }
            Err(e) => summary.push_error(row + 2, e),
        }
    }
    Ok((airlines, summary))
}

struct RouteColumns {
    airline_code: usize,
    airline_id: usize,
    origin_code: usize,
    origin_id: usize,
    destination_code: usize,
    destination_id: usize,
    tickets_sold: usize,
    total_seats: usize,
    flight_date: usize,
    codeshare: Option<usize>,
    stops: Option<usize>,
    equipment: Option<usize>,
    price: Option<usize>,
    kilometers: Option<usize>,
}

impl RouteColumns {
    fn resolve(columns: &Columns) -> Result<Self, IngestError> {
        Ok(Self {
            airline_code: columns.required("CodAerolinea")?,
            airline_id: columns.required("IDAerolinea")?,
            origin_code: columns.required("AeropuertoOrigen")?,
            origin_id: columns.required("AeropuertoOrigenID")?,
            destination_code: columns.required("AeropuertoDestino")?,
            destination_id: columns.required("AeropuertoDestinoID")?,
            tickets_sold: columns.required("TicketsVendidos")?,
            total_seats: columns.required("Lugares")?,
            flight_date: columns.required("Fecha")?,
            codeshare: columns.optional("Codeshare"),
            stops: columns.optional("Escalas"),
            equipment: columns.optional("Equipo"),
            price: columns.optional("Precio"),
            kilometers: columns.optional("Km"),
        })
    }
}

/// Read a pipe-separated routes CSV. Referential integrity is enforced
/// here, at the ingestion boundary: a route naming an unknown airport or
/// airline is rejected with a row-numbered error so the engine can assume
/// resolved references. Rows with non-positive seats are kept; the
/// occupancy calculator owns that case.
pub fn read_routes<R: Read>(
    input: R,
    file_name: &str,
    airports: &HashMap<i32, Airport>,
    airlines: &HashMap<i32, Airline>,
    next_id: &mut i64,
) -> Result<(Vec<Route>, LoadSummary), IngestError> {
    let mut reader = ReaderBuilder::new()
        .delimiter(b'|')
        .flexible(true)
        .from_reader(input);
    let columns = RouteColumns::resolve(&Columns::new(reader.headers()?, "routes.csv"))?;

    let mut routes = Vec::new();
    let mut summary = LoadSummary::new(file_name);
    for (row, record) in reader.records().enumerate() {
        let record = record?;
        match parse_route(&columns, &record, airports, airlines) {
            Ok(mut route) => {
                route.id = *next_id;
                *next_id += 1;
                routes.push(route);
                summary.loaded += 1;
            }
            Err(e) => summary.push_error(row + 2, e),
        }
    }
    Ok((routes, summary))
}

fn parse_route(
    columns: &RouteColumns,
    record: &StringRecord,
    airports: &HashMap<i32, Airport>,
    airlines: &HashMap<i32, Airline>,
) -> Result<Route, String> {
    let airline_id: i32 = parse_req(field(record, columns.airline_id), "IDAerolinea")?;
    let origin_id: i32 = parse_req(field(record, columns.origin_id), "AeropuertoOrigenID")?;
    let destination_id: i32 =
        parse_req(field(record, columns.destination_id), "AeropuertoDestinoID")?;

    if !airlines.contains_key(&airline_id) {
        return Err(format!("unknown airline id {airline_id}"));
    }
    if !airports.contains_key(&origin_id) {
        return Err(format!("unknown origin airport id {origin_id}"));
    }
    if !airports.contains_key(&destination_id) {
        return Err(format!("unknown destination airport id {destination_id}"));
    }

    let tickets_sold: i64 = parse_req(field(record, columns.tickets_sold), "TicketsVendidos")?;
    let total_seats: i64 = parse_req(field(record, columns.total_seats), "Lugares")?;
    if total_seats > 0 && tickets_sold > total_seats {
        return Err(format!(
            "tickets sold ({tickets_sold}) exceeds seats ({total_seats})"
        ));
    }

    let date_field = clean(field(record, columns.flight_date)).ok_or("missing Fecha")?;
    let flight_date = NaiveDate::parse_from_str(date_field, "%Y-%m-%d")
        .map_err(|_| format!("invalid date {date_field:?}"))?;

    Ok(Route {
        id: 0, // assigned by the caller
        airline_id,
        airline_code: clean(field(record, columns.airline_code))
            .unwrap_or_default()
            .to_string(),
        origin_id,
        origin_code: clean(field(record, columns.origin_code))
            .unwrap_or_default()
            .to_string(),
        destination_id,
        destination_code: clean(field(record, columns.destination_code))
            .unwrap_or_default()
            .to_string(),
        codeshare: opt_field(record, columns.codeshare).is_some_and(|c| c.eq_ignore_ascii_case("Y")),
        stops: opt_field(record, columns.stops)
            .and_then(|s| s.parse().ok())
            .unwrap_or(0),
        equipment: opt_field(record, columns.equipment).map(str::to_string),
        tickets_sold,
        total_seats,
        price: opt_field(record, columns.price).and_then(|p| p.parse().ok()),
        kilometers: opt_field(record, columns.kilometers).and_then(|k| k.parse().ok()),
        flight_date,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    const AIRPORTS: &str = "\
1,\"Lavacolla\",\"Santiago\",\"Spain\",\"SCQ\",42.89,-8.41,369,1,\"EU\",\"Europe/Madrid\"
2,\"Peinador\",\"Vigo\",\"Spain\",\"VGO\",42.23,-8.62,261,1,\"EU\",\"Europe/Madrid\"
3,\"Charles de Gaulle\",\"Paris\",\"France\",\"CDG\",49.01,2.55,\\N,1,\"EU\",\"Europe/Paris\"
";

    const AIRLINES: &str = "\
IDAerolinea,NombreAerolinea,Alias,IATA,ICAO,Callsign,Pais,Activa
10,Iberia,\\N,IB,IBE,IBERIA,Spain,Y
11,Defunct Air,-,-,\\N,\\N,France,N
";

    const ROUTES: &str = "\
CodAerolinea|IDAerolinea|AeropuertoOrigen|AeropuertoOrigenID|AeropuertoDestino|AeropuertoDestinoID|Codeshare|Escalas|Equipo|TicketsVendidos|Lugares|Precio|Km|Fecha
IB|10|SCQ|1|VGO|2|N|0|CR2|85|100|120.5|95.0|2024-01-01
IB|10|SCQ|1|CDG|3|Y|0|320|150|180|210.0|1050.2|2024-01-02
IB|10|SCQ|1|VGO|99|N|0|CR2|10|100|99.0|95.0|2024-01-03
IB|10|SCQ|1|VGO|2|N|0|CR2|120|100|99.0|95.0|2024-01-04
IB|10|VGO|2|SCQ|1|N|0|CR2|10|0|99.0|95.0|2024-01-05
";

    fn keyed<T, F: Fn(&T) -> i32>(items: Vec<T>, key: F) -> HashMap<i32, T> {
        items.into_iter().map(|i| (key(&i), i)).collect()
    }

    #[test]
    fn parses_airports_with_null_markers() {
        let (airports, summary) = read_airports(AIRPORTS.as_bytes()).unwrap();
        assert_eq!(summary.loaded, 3);
        assert!(summary.errors.is_empty());
        assert_eq!(airports[0].code.as_deref(), Some("SCQ"));
        assert_eq!(airports[0].altitude, Some(369));
        assert_eq!(airports[2].altitude, None);
        assert_eq!(airports[0].timezone.as_deref(), Some("Europe/Madrid"));
    }

    #[test]
    fn skips_airport_header_row_when_present() {
        let with_header = format!("id,name,city,country,code,lat,lon,alt\n{AIRPORTS}");
        let (airports, _) = read_airports(with_header.as_bytes()).unwrap();
        assert_eq!(airports.len(), 3);
    }

    #[test]
    fn parses_airlines_and_normalizes_nulls() {
        let (airlines, summary) = read_airlines(AIRLINES.as_bytes()).unwrap();
        assert_eq!(summary.loaded, 2);
        assert_eq!(airlines[0].iata_code.as_deref(), Some("IB"));
        assert!(airlines[0].active);
        assert_eq!(airlines[1].alias, None);
        assert_eq!(airlines[1].iata_code, None);
        assert!(!airlines[1].active);
    }

    #[test]
    fn routes_reject_unknown_references_and_overbooked_rows() {
        let (airports, _) = read_airports(AIRPORTS.as_bytes()).unwrap();
        let (airlines, _) = read_airlines(AIRLINES.as_bytes()).unwrap();
        let airports = keyed(airports, |a| a.id);
        let airlines = keyed(airlines, |a| a.id);

        let mut next_id = 1;
        let (routes, summary) =
            read_routes(ROUTES.as_bytes(), "routes.csv", &airports, &airlines, &mut next_id)
                .unwrap();

        // row 4 (unknown airport 99) and row 5 (overbooked) rejected
        assert_eq!(summary.loaded, 3);
        assert_eq!(summary.errors.len(), 2);
        assert!(summary.errors[0].contains("unknown destination airport id 99"));
        assert!(summary.errors[1].contains("exceeds seats"));

        // seats = 0 row is kept for the engine's undefined-ratio handling
        assert_eq!(routes[2].total_seats, 0);
        assert_eq!(routes.iter().map(|r| r.id).collect::<Vec<_>>(), vec![1, 2, 3]);
        assert!(routes[1].codeshare);
        assert_eq!(routes[0].equipment.as_deref(), Some("CR2"));
        assert_eq!(
            routes[0].flight_date,
            NaiveDate::from_ymd_opt(2024, 1, 1).unwrap()
        );
    }

    #[test]
    fn missing_required_column_is_a_file_error() {
        let bad = "CodAerolinea|IDAerolinea\nIB|10\n";
        let (airports, _) = read_airports(AIRPORTS.as_bytes()).unwrap();
        let (airlines, _) = read_airlines(AIRLINES.as_bytes()).unwrap();
        let err = read_routes(
            bad.as_bytes(),
            "routes.csv",
            &keyed(airports, |a| a.id),
            &keyed(airlines, |a| a.id),
            &mut 1,
        )
        .unwrap_err();
        assert!(matches!(err, IngestError::MissingColumn { .. }));
    }
}
