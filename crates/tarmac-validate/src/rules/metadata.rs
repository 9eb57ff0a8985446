//! Airport metadata key/value checks

use crate::code::Code;
use crate::diagnostic::Findings;
use regex::Regex;
use std::sync::LazyLock;
use tarmac_core::NodeId;
use tarmac_scene::entity::AirportData;

pub const KNOWN_KEYS: &[&str] = &[
    "city",
    "country",
    "datum_lat",
    "datum_lon",
    "drive_on_left",
    "faa_code",
    "flatten",
    "gui_label",
    "iata_code",
    "icao_code",
    "local_authority",
    "local_code",
    "region_code",
    "state",
    "transition_alt",
    "transition_level",
];

/// ISO 3166-1 alpha-2 country codes
const ISO_3166_ALPHA2: &[&str] = &[
    "AD", "AE", "AF", "AG", "AI", "AL", "AM", "AO", "AQ", "AR", "AS", "AT", "AU", "AW", "AX", "AZ",
    "BA", "BB", "BD", "BE", "BF", "BG", "BH", "BI", "BJ", "BL", "BM", "BN", "BO", "BQ", "BR", "BS",
    "BT", "BV", "BW", "BY", "BZ", "CA", "CC", "CD", "CF", "CG", "CH", "CI", "CK", "CL", "CM", "CN",
    "CO", "CR", "CU", "CV", "CW", "CX", "CY", "CZ", "DE", "DJ", "DK", "DM", "DO", "DZ", "EC", "EE",
    "EG", "EH", "ER", "ES", "ET", "FI", "FJ", "FK", "FM", "FO", "FR", "GA", "GB", "GD", "GE", "GF",
    "GG", "GH", "GI", "GL", "GM", "GN", "GP", "GQ", "GR", "GS", "GT", "GU", "GW", "GY", "HK", "HM",
    "HN", "HR", "HT", "HU", "ID", "IE", "IL", "IM", "IN", "IO", "IQ", "IR", "IS", "IT", "JE", "JM",
    "JO", "JP", "KE", "KG", "KH", "KI", "KM", "KN", "KP", "KR", "KW", "KY", "KZ", "LA", "LB", "LC",
    "LI", "LK", "LR", "LS", "LT", "LU", "LV", "LY", "MA", "MC", "MD", "ME", "MF", "MG", "MH", "MK",
    "ML", "MM", "MN", "MO", "MP", "MQ", "MR", "MS", "MT", "MU", "MV", "MW", "MX", "MY", "MZ", "NA",
    "NC", "NE", "NF", "NG", "NI", "NL", "NO", "NP", "NR", "NU", "NZ", "OM", "PA", "PE", "PF", "PG",
    "PH", "PK", "PL", "PM", "PN", "PR", "PS", "PT", "PW", "PY", "QA", "RE", "RO", "RS", "RU", "RW",
    "SA", "SB", "SC", "SD", "SE", "SG", "SH", "SI", "SJ", "SK", "SL", "SM", "SN", "SO", "SR", "SS",
    "ST", "SV", "SX", "SY", "SZ", "TC", "TD", "TF", "TG", "TH", "TJ", "TK", "TL", "TM", "TN", "TO",
    "TR", "TT", "TV", "TW", "TZ", "UA", "UG", "UM", "US", "UY", "UZ", "VA", "VC", "VE", "VG", "VI",
    "VN", "VU", "WF", "WS", "YE", "YT", "ZA", "ZM", "ZW",
];

static URL_LIKE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(https?://|www\.|\.(com|org|net)\b)").unwrap());
static ICAO_LIKE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{4}$").unwrap());
static ICAO_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{4}$").unwrap());
static IATA_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z]{3}$").unwrap());
static LOCAL_CODE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"^[A-Z0-9]{3,4}$").unwrap());
static FLIGHT_LEVEL: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(FL)?[0-9]{2,3}$").unwrap());


/// Problem with a single key's value, if any
fn value_problem(key: &str, value: &str, icao: &str) -> Option<String> {
    match key {
        "country" => {
            let prefix: String = value.chars().take(2).collect();
            (!ISO_3166_ALPHA2.contains(&prefix.as_str()))
                .then(|| format!("country '{}' must start with an ISO 3166 two letter code", value))
        }
        "city" | "state" => value
            .chars()
            .all(|c| c.is_ascii_digit() || c.is_whitespace())
            .then(|| format!("{} '{}' must be a name, not a number", key, value)),
        "datum_lat" => match value.parse::<f64>() {
            Ok(v) if (-90.0..=90.0).contains(&v) => None,
            _ => Some(format!("datum_lat '{}' is not a latitude", value)),
        },
        "datum_lon" => match value.parse::<f64>() {
            Ok(v) if (-180.0..=180.0).contains(&v) => None,
            _ => Some(format!("datum_lon '{}' is not a longitude", value)),
        },
        "transition_alt" => match value.parse::<f64>() {
            Ok(v) if (200.0..=30_000.0).contains(&v) => None,
            _ => Some(format!(
                "transition_alt '{}' must be a number of feet between 200 and 30000",
                value
            )),
        },
        "transition_level" => (!FLIGHT_LEVEL.is_match(value))
            .then(|| format!("transition_level '{}' must be a flight level", value)),
        "icao_code" => {
            if !ICAO_CODE.is_match(value) {
                Some(format!("icao_code '{}' must be four uppercase letters or digits", value))
            } else if ICAO_LIKE.is_match(icao) && value != icao {
                Some(format!("icao_code '{}' does not match the airport id '{}'", value, icao))
            } else {
                None
            }
        }
        "iata_code" => (!IATA_CODE.is_match(value))
            .then(|| format!("iata_code '{}' must be three uppercase letters", value)),
        "faa_code" | "local_code" => (!LOCAL_CODE.is_match(value)).then(|| {
            format!("{} '{}' must be three or four uppercase letters or digits", key, value)
        }),
        "gui_label" => (!matches!(value, "2D" | "3D"))
            .then(|| format!("gui_label '{}' must be 2D or 3D", value)),
        "drive_on_left" | "flatten" => (!matches!(value, "0" | "1"))
            .then(|| format!("{} '{}' must be 0 or 1", key, value)),
        _ => None,
    }
}

/// Keys that only make sense together
const PAIRED_KEYS: &[(&str, &str)] = &[("datum_lat", "datum_lon"), ("transition_alt", "transition_level")];

pub fn check_metadata(airport_id: NodeId, airport: &AirportData, out: &mut Findings) {
    let icao = airport.icao.as_str();

    for (key, value) in &airport.metadata {
        if !KNOWN_KEYS.contains(&key.as_str()) {
            out.emit(
                Code::MetadataUnknownKey,
                format!("Metadata key '{}' is not a known key.", key),
                [airport_id],
            );
            continue;
        }
        let value = value.trim();
        if value.is_empty() {
            out.emit(
                Code::MetadataEmptyValue,
                format!("Metadata key '{}' has no value.", key),
                [airport_id],
            );
            continue;
        }
        if URL_LIKE.is_match(value) {
            out.emit(
                Code::MetadataUrl,
                format!("Metadata key '{}' looks like a web address: '{}'.", key, value),
                [airport_id],
            );
            continue;
        }
        if let Some(problem) = value_problem(key, value, icao) {
            out.emit(Code::MetadataInvalid, format!("Metadata {}.", problem), [airport_id]);
        }
    }

    for (a, b) in PAIRED_KEYS {
        let has_a = airport.metadata.contains_key(*a);
        let has_b = airport.metadata.contains_key(*b);
        if has_a != has_b {
            let (present, missing) = if has_a { (a, b) } else { (b, a) };
            out.emit(
                Code::MetadataInvalid,
                format!("Metadata key '{}' requires '{}' as well.", present, missing),
                [airport_id],
            );
        }
    }
}
