//! Normalizes a raw e-ticket availability payload into structured train/car
//! data plus an overall availability flag.
//!
//! The payload is deeply nested and loosely typed: `directions` may be a list
//! or a keyed map, car types may be strings or objects, fares may sit on the
//! car or inside a tariff list. Everything here defaults instead of failing;
//! a malformed entry is skipped or zeroed, never propagated.

use serde_json::Value;

use crate::formatting::thousands;

/// One car class with free seats on a qualifying train.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CarInfo {
    pub kind: String,
    pub free_seats: i64,
    /// Fare, thousands-separated (e.g. `142,980`).
    pub fare: String,
    pub upper: i64,
    pub lower: i64,
    pub lateral_upper: i64,
    pub lateral_lower: i64,
}

/// A train with at least one car that has free seats.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TrainInfo {
    pub number: String,
    /// Brand when present, otherwise the train type; may be empty.
    pub kind: String,
    /// The train's own origin-destination label, which may differ from the
    /// searched pair.
    pub route_label: String,
    /// Display string, `DD.MM.YYYY - HH:MM`.
    pub departure: String,
    pub arrival: String,
    /// Raw `HH:MM` time-on-way string as sent by the API.
    pub time_on_way: String,
    pub cars: Vec<CarInfo>,
}

#[derive(Clone, Debug, Default)]
pub struct TicketAvailability {
    pub available: bool,
    pub trains: Vec<TrainInfo>,
    /// Duration in minutes of the *last* qualifying train processed. This
    /// last-wins selection matches the final displayed block downstream.
    pub primary_duration_min: i64,
}

/// The `directions` collection comes in two shapes; resolve once at the
/// boundary and only ever consult the first entry.
enum Directions<'a> {
    Indexed(&'a [Value]),
    Keyed(&'a serde_json::Map<String, Value>),
}

impl<'a> Directions<'a> {
    fn resolve(data: &'a Value) -> Option<Self> {
        match data.get("directions") {
            Some(Value::Array(items)) => Some(Directions::Indexed(items)),
            Some(Value::Object(map)) => Some(Directions::Keyed(map)),
            _ => None,
        }
    }

    fn first(&self) -> Option<&'a Value> {
        match self {
            Directions::Indexed(items) => items.first(),
            Directions::Keyed(map) => map.values().next(),
        }
    }
}

fn first_direction(raw: &Value) -> Option<&Value> {
    let data = raw.get("data")?;
    Directions::resolve(data)?.first()
}

/// Localized station names of the searched pair, taken from the first train
/// of the response. Used to refresh route display names opportunistically.
pub fn station_names_from_response(raw: &Value) -> Option<(String, String)> {
    let first_train = first_direction(raw)?
        .get("trains")?
        .as_array()?
        .first()?;
    let dep = str_field(first_train, "departureStation");
    let arv = str_field(first_train, "arrivalStation");
    if dep.is_empty() || arv.is_empty() {
        return None;
    }
    Some((dep, arv))
}

/// Parse an availability payload. Absent directions mean "no trains".
pub fn parse_availability(raw: &Value) -> TicketAvailability {
    let mut out = TicketAvailability::default();

    let Some(trains_raw) = first_direction(raw)
        .and_then(|d| d.get("trains"))
        .and_then(Value::as_array)
    else {
        return out;
    };

    for train in trains_raw {
        let cars = parse_cars(train);
        if cars.is_empty() {
            continue;
        }

        out.available = true;
        out.primary_duration_min = train.get("duration").and_then(Value::as_i64).unwrap_or(0);

        let origin_route = train.get("originRoute");
        let route_label = format!(
            "{} - {}",
            origin_route
                .and_then(|r| r.get("depStationName"))
                .and_then(Value::as_str)
                .unwrap_or("?"),
            origin_route
                .and_then(|r| r.get("arvStationName"))
                .and_then(Value::as_str)
                .unwrap_or("?"),
        );

        let mut kind = str_field(train, "brand");
        if kind.is_empty() {
            kind = str_field(train, "type");
        }

        out.trains.push(TrainInfo {
            number: str_field(train, "number"),
            kind,
            route_label,
            // API sends "15.01.2026 21:12"; display wants "15.01.2026 - 21:12".
            departure: str_field(train, "departureDate").replace(' ', " - "),
            arrival: str_field(train, "arrivalDate").replace(' ', " - "),
            time_on_way: str_field(train, "timeOnWay"),
            cars,
        });
    }

    out
}

/// Cars with free seats only; a car with `freeSeats == 0` contributes to
/// neither availability nor the emitted list.
fn parse_cars(train: &Value) -> Vec<CarInfo> {
    let Some(cars_raw) = train.get("cars").and_then(Value::as_array) else {
        return Vec::new();
    };

    let mut cars = Vec::new();
    for car in cars_raw {
        if !car.is_object() {
            continue;
        }

        let free = car.get("freeSeats").and_then(Value::as_i64).unwrap_or(0);
        if free <= 0 {
            continue;
        }

        // Car type is either a plain string or an object with a `name`.
        let kind = match car.get("type") {
            Some(Value::String(s)) => s.clone(),
            Some(Value::Object(map)) => map
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            _ => String::new(),
        };

        let seat_detail = car.get("seatDetail");

        cars.push(CarInfo {
            kind,
            free_seats: free,
            fare: thousands(fare_of(car)),
            upper: seat_count(seat_detail, "up"),
            lower: seat_count(seat_detail, "down"),
            lateral_upper: seat_count(seat_detail, "lateralUp"),
            lateral_lower: seat_count(seat_detail, "lateralDn"),
        });
    }
    cars
}

/// Fare sits on the car directly, or inside the first tariff entry.
fn fare_of(car: &Value) -> i64 {
    let direct = int_field(car.get("tariff"));
    if direct > 0 {
        return direct;
    }
    int_field(
        car.get("tariffs")
            .and_then(Value::as_array)
            .and_then(|ts| ts.first())
            .and_then(|t| t.get("tariff")),
    )
}

/// Integer out of a JSON number that may arrive as a float.
fn int_field(v: Option<&Value>) -> i64 {
    match v {
        Some(Value::Number(n)) => n
            .as_i64()
            .or_else(|| n.as_f64().map(|f| f as i64))
            .unwrap_or(0),
        _ => 0,
    }
}

fn seat_count(seat_detail: Option<&Value>, key: &str) -> i64 {
    seat_detail
        .and_then(|d| d.get(key))
        .and_then(Value::as_i64)
        .unwrap_or(0)
}

fn str_field(v: &Value, key: &str) -> String {
    v.get(key)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn payload_with_trains(trains: Value) -> Value {
        json!({ "data": { "directions": [ { "trains": trains } ] } })
    }

    fn seated_car(free: i64) -> Value {
        json!({
            "type": "Купейный",
            "freeSeats": free,
            "tariff": 142_980,
            "seatDetail": { "up": 68, "down": 64, "lateralUp": 45, "lateralDn": 45 }
        })
    }

    #[test]
    fn empty_directions_mean_no_trains() {
        let raw = json!({ "data": { "directions": [] } });
        let parsed = parse_availability(&raw);
        assert!(!parsed.available);
        assert!(parsed.trains.is_empty());
        assert_eq!(parsed.primary_duration_min, 0);
    }

    #[test]
    fn missing_data_never_panics() {
        for raw in [json!({}), json!(null), json!({ "data": { "directions": 42 } })] {
            let parsed = parse_availability(&raw);
            assert!(!parsed.available);
        }
    }

    #[test]
    fn keyed_directions_use_first_entry() {
        let raw = json!({
            "data": { "directions": { "forward": { "trains": [ {
                "number": "127Ф",
                "duration": 256,
                "cars": [seated_car(12)]
            } ] } } }
        });
        let parsed = parse_availability(&raw);
        assert!(parsed.available);
        assert_eq!(parsed.trains[0].number, "127Ф");
    }

    #[test]
    fn zero_seat_car_contributes_nothing() {
        let raw = payload_with_trains(json!([
            { "number": "10", "cars": [ { "type": "Купейный", "freeSeats": 0, "tariff": 1 } ] }
        ]));
        let parsed = parse_availability(&raw);
        assert!(!parsed.available);
        assert!(parsed.trains.is_empty());
    }

    #[test]
    fn primary_duration_is_last_qualifying_train() {
        let raw = payload_with_trains(json!([
            { "number": "1", "duration": 100, "cars": [seated_car(5)] },
            { "number": "2", "duration": 200, "cars": [ { "freeSeats": 0 } ] },
            { "number": "3", "duration": 300, "cars": [seated_car(5)] },
        ]));
        let parsed = parse_availability(&raw);
        assert_eq!(parsed.trains.len(), 2);
        assert_eq!(parsed.primary_duration_min, 300);
    }

    #[test]
    fn fare_falls_back_to_tariff_list() {
        let raw = payload_with_trains(json!([
            { "number": "5", "cars": [ {
                "type": { "name": "Плацкартный" },
                "freeSeats": 3,
                "tariffs": [ { "tariff": 98_000 }, { "tariff": 1 } ]
            } ] }
        ]));
        let parsed = parse_availability(&raw);
        let car = &parsed.trains[0].cars[0];
        assert_eq!(car.kind, "Плацкартный");
        assert_eq!(car.fare, "98,000");
    }

    #[test]
    fn seat_subtypes_default_to_zero() {
        let raw = payload_with_trains(json!([
            { "number": "5", "cars": [ { "type": "SV", "freeSeats": 2, "tariff": 10 } ] }
        ]));
        let car = &parse_availability(&raw).trains[0].cars[0];
        assert_eq!((car.upper, car.lower, car.lateral_upper, car.lateral_lower), (0, 0, 0, 0));
    }

    #[test]
    fn datetime_separator_is_reformatted() {
        let raw = payload_with_trains(json!([
            {
                "number": "127Ф",
                "brand": "Afrosiyob",
                "departureDate": "15.01.2026 21:12",
                "arrivalDate": "16.01.2026 11:08",
                "timeOnWay": "13:56",
                "originRoute": { "depStationName": "Андижан 1", "arvStationName": "Кунград" },
                "cars": [seated_car(12)]
            }
        ]));
        let train = &parse_availability(&raw).trains[0];
        assert_eq!(train.departure, "15.01.2026 - 21:12");
        assert_eq!(train.arrival, "16.01.2026 - 11:08");
        assert_eq!(train.route_label, "Андижан 1 - Кунград");
        assert_eq!(train.kind, "Afrosiyob");
    }

    #[test]
    fn station_names_come_from_first_train() {
        let raw = payload_with_trains(json!([
            { "departureStation": "ТАШКЕНТ", "arrivalStation": "САМАРКАНД", "cars": [] }
        ]));
        assert_eq!(
            station_names_from_response(&raw),
            Some(("ТАШКЕНТ".to_string(), "САМАРКАНД".to_string()))
        );
        assert_eq!(station_names_from_response(&json!({})), None);
    }
}
