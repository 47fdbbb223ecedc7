// src/common/dates.rs

use chrono::{DateTime, Local, NaiveDate, NaiveDateTime, NaiveTime};

/// Formato de data/hora que o Sankhya espera (e que devolvemos nas consultas).
pub const ERP_TIMESTAMP_FORMAT: &str = "%d/%m/%Y %H:%M:%S";
pub const DISPLAY_DATE_FORMAT: &str = "%d/%m/%Y";

const NAIVE_FORMATS: [&str; 5] = [
    "%Y-%m-%dT%H:%M:%S%.f",
    "%Y-%m-%dT%H:%M",
    "%Y-%m-%d %H:%M:%S%.f",
    "%Y-%m-%d %H:%M",
    ERP_TIMESTAMP_FORMAT,
];

/// Converte `YYYY-MM-DD` em `DD/MM/YYYY`. Qualquer outro formato passa intacto.
pub fn to_display_date(input: &str) -> String {
    let date_part = input.split_once('T').map_or(input, |(date, _)| date);
    let parts: Vec<&str> = date_part.split('-').collect();

    match parts.as_slice() {
        [ano, mes, dia] => format!("{dia}/{mes}/{ano}"),
        _ => input.to_string(),
    }
}

pub fn parse_display_date(input: &str) -> Option<NaiveDate> {
    NaiveDate::parse_from_str(input.trim(), DISPLAY_DATE_FORMAT).ok()
}

/// Interpreta uma data/hora vinda do frontend no horário LOCAL do servidor.
///
/// Aceita ISO com fuso (`2024-03-05T17:30:00Z`, convertido para o fuso local),
/// ISO sem fuso (já considerado local), o formato do ERP (`05/03/2024 14:30:00`)
/// e datas puras (`2024-03-05`, `05/03/2024`), que viram meia-noite local.
pub fn parse_local_timestamp(input: &str) -> Option<NaiveDateTime> {
    let input = input.trim();
    if input.is_empty() {
        return None;
    }

    if let Ok(with_offset) = DateTime::parse_from_rfc3339(input) {
        return Some(with_offset.with_timezone(&Local).naive_local());
    }

    NAIVE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(input, fmt).ok())
        .or_else(|| {
            NaiveDate::parse_from_str(input, "%Y-%m-%d")
                .ok()
                .or_else(|| parse_display_date(input))
                .map(|date| date.and_time(NaiveTime::MIN))
        })
}

/// `2024-03-05T14:30:00` -> `05/03/2024 14:30:00`. Entrada inválida vira string vazia.
pub fn format_erp_timestamp(input: &str) -> String {
    parse_local_timestamp(input)
        .map(|ts| ts.format(ERP_TIMESTAMP_FORMAT).to_string())
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};

    #[test]
    fn converts_iso_date_to_display_format() {
        assert_eq!(to_display_date("2024-12-31"), "31/12/2024");
        assert_eq!(to_display_date("2024-12-31T00:00:00"), "31/12/2024");
    }

    #[test]
    fn display_date_passes_through() {
        assert_eq!(to_display_date("31/12/2024"), "31/12/2024");
        assert_eq!(to_display_date(""), "");
    }

    #[test]
    fn formats_naive_iso_with_local_fields() {
        assert_eq!(format_erp_timestamp("2024-03-05T14:30:00"), "05/03/2024 14:30:00");
        assert_eq!(format_erp_timestamp("2024-03-05T14:30:00.000"), "05/03/2024 14:30:00");
        assert_eq!(format_erp_timestamp("2024-03-05T09:05"), "05/03/2024 09:05:00");
    }

    #[test]
    fn converts_offset_timestamps_to_local_time() {
        let utc = Utc.with_ymd_and_hms(2024, 3, 5, 17, 30, 0).unwrap();
        let expected = utc
            .with_timezone(&Local)
            .format(ERP_TIMESTAMP_FORMAT)
            .to_string();

        assert_eq!(format_erp_timestamp("2024-03-05T17:30:00Z"), expected);
    }

    #[test]
    fn invalid_dates_format_to_empty_string() {
        assert_eq!(format_erp_timestamp("não é data"), "");
        assert_eq!(format_erp_timestamp("2024-13-45T99:00:00"), "");
        assert_eq!(format_erp_timestamp(""), "");
    }

    #[test]
    fn date_only_inputs_are_local_midnight() {
        let expected = NaiveDate::from_ymd_opt(2024, 3, 5)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap();
        assert_eq!(parse_local_timestamp("2024-03-05"), Some(expected));
        assert_eq!(parse_local_timestamp("05/03/2024"), Some(expected));
    }

    #[test]
    fn accepts_erp_format_back() {
        let parsed = parse_local_timestamp("05/03/2024 14:30:00").unwrap();
        assert_eq!(parsed.format(ERP_TIMESTAMP_FORMAT).to_string(), "05/03/2024 14:30:00");
    }
}
