//! CSV export helpers

use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
};
use csv::Writer;

#[derive(Debug, thiserror::Error)]
pub enum ExportError {
    #[error("CSV encoding failed: {0}")]
    Csv(#[from] csv::Error),

    #[error("CSV buffer error: {0}")]
    Io(#[from] std::io::Error),
}

/// Encode a header row plus data rows into CSV bytes
pub fn write_csv<I, R>(headers: &[&str], rows: I) -> Result<Vec<u8>, ExportError>
where
    I: IntoIterator<Item = R>,
    R: IntoIterator,
    R::Item: AsRef<[u8]>,
{
    let mut wtr = Writer::from_writer(Vec::new());
    wtr.write_record(headers)?;
    for row in rows {
        wtr.write_record(row)?;
    }
    wtr.flush()?;
    wtr.into_inner().map_err(|e| ExportError::Io(e.into_error()))
}

/// `200 OK` with `text/csv` and an attachment file name
pub fn csv_response(filename: &str, body: Vec<u8>) -> Response {
    (
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", filename),
            ),
        ],
        body,
    )
        .into_response()
}

/// Render an optional value as an empty cell when absent
pub fn cell<T: ToString>(value: Option<T>) -> String {
    value.map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_write_csv_quotes_fields_with_commas() {
        let bytes = write_csv(
            &["name", "address"],
            vec![vec!["Asha Rao".to_string(), "12 Hill Rd, Pune".to_string()]],
        )
        .unwrap();
        let text = String::from_utf8(bytes).unwrap();
        assert_eq!(text, "name,address\nAsha Rao,\"12 Hill Rd, Pune\"\n");
    }

    #[test]
    fn test_header_only_when_no_rows() {
        let bytes = write_csv(&["id"], Vec::<Vec<String>>::new()).unwrap();
        assert_eq!(bytes, b"id\n");
    }

    #[test]
    fn test_cell() {
        assert_eq!(cell(Some(5)), "5");
        assert_eq!(cell::<String>(None), "");
    }
}
