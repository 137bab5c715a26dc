use std::io::Read;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::Deserialize;
use thiserror::Error;

use super::model::{
    parse_currency, parse_number, parse_optional_number, parse_percent, ForecastRow,
    FulfillmentRow, LifecycleRow, Period, ShortfallRow,
};

#[derive(Debug, Error)]
pub enum LoadError {
    #[error("opening {path}: {source}")]
    Open {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("reading CSV headers: {0}")]
    Headers(#[source] csv::Error),
}

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// A row type that can be decoded from one CSV record.
///
/// Decoding goes through a raw record of string cells so that a malformed
/// number never rejects a row; conversion applies the lenient parsers.
pub trait CsvRow: Sized {
    type Raw: DeserializeOwned;

    fn from_raw(raw: Self::Raw) -> Self;
}

/// Load every row of a CSV file.
pub fn load_file<T: CsvRow>(path: &Path) -> Result<Vec<T>, LoadError> {
    let file = std::fs::File::open(path).map_err(|source| LoadError::Open {
        path: path.to_path_buf(),
        source,
    })?;
    let rows = load_reader(file)?;
    log::info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Load rows from any CSV source with a header line.
///
/// Short records are padded with empty cells. Records that still cannot be
/// decoded are logged and skipped.
pub fn load_reader<T: CsvRow, R: Read>(reader: R) -> Result<Vec<T>, LoadError> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = csv_reader.headers().map_err(LoadError::Headers)?.clone();

    let mut rows = Vec::new();
    for (line_num, result) in csv_reader.records().enumerate() {
        let decoded = result.and_then(|mut record| {
            // Spreadsheet exports drop trailing empty cells.
            while record.len() < headers.len() {
                record.push_field("");
            }
            record.deserialize::<T::Raw>(Some(&headers))
        });
        match decoded {
            Ok(raw) => rows.push(T::from_raw(raw)),
            Err(e) => log::warn!("Skipping CSV line {}: {e}", line_num + 2),
        }
    }
    Ok(rows)
}

// ---------------------------------------------------------------------------
// Raw records
// ---------------------------------------------------------------------------

/// Columns: `product, SKU, Depot, Month, Actual, Fitted, Forecast, Accuracy`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawForecast {
    product: String,
    #[serde(rename = "SKU")]
    sku: String,
    #[serde(rename = "Depot")]
    depot: String,
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Actual")]
    actual: String,
    #[serde(rename = "Fitted")]
    fitted: String,
    #[serde(rename = "Forecast")]
    forecast: String,
    #[serde(rename = "Accuracy")]
    accuracy: String,
}

impl CsvRow for ForecastRow {
    type Raw = RawForecast;

    fn from_raw(raw: RawForecast) -> Self {
        ForecastRow {
            period: Period::parse(&raw.month),
            actual: parse_number(&raw.actual),
            fitted: parse_number(&raw.fitted),
            forecast: parse_number(&raw.forecast),
            accuracy: parse_percent(&raw.accuracy),
            has_accuracy: !raw.accuracy.is_empty(),
            product: raw.product,
            sku: raw.sku,
            depot: raw.depot,
            month: raw.month,
        }
    }
}

/// Columns: `Customer, Financial Year, Product, Month, Sales`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLifecycle {
    #[serde(rename = "Customer")]
    customer: String,
    #[serde(rename = "Financial Year")]
    financial_year: String,
    #[serde(rename = "Product")]
    product: String,
    #[serde(rename = "Month")]
    month: String,
    #[serde(rename = "Sales")]
    sales: String,
}

impl CsvRow for LifecycleRow {
    type Raw = RawLifecycle;

    fn from_raw(raw: RawLifecycle) -> Self {
        LifecycleRow {
            sales: parse_number(&raw.sales),
            customer: raw.customer,
            financial_year: raw.financial_year,
            product: raw.product,
            month: raw.month,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawShortfall {
    #[serde(rename = "FY")]
    fy: String,
    #[serde(rename = "CATEGORY")]
    category: String,
    #[serde(rename = "Months")]
    months: String,
    #[serde(rename = "Shortfall in Revenue")]
    shortfall_in_revenue: String,
    #[serde(rename = "Impactful Shortfall")]
    impactful: String,
    #[serde(rename = "SHORTFALL (PEND. SO)")]
    pending_so: String,
    #[serde(rename = "CLOSING STOCK")]
    closing_stock: String,
    #[serde(rename = "PER UNIT")]
    per_unit: String,
}

impl CsvRow for ShortfallRow {
    type Raw = RawShortfall;

    fn from_raw(raw: RawShortfall) -> Self {
        ShortfallRow {
            shortfall_in_revenue: parse_number(&raw.shortfall_in_revenue),
            impactful: parse_number(&raw.impactful) == 1.0,
            pending_so: parse_number(&raw.pending_so),
            closing_stock: parse_number(&raw.closing_stock),
            per_unit: parse_currency(&raw.per_unit),
            fy: raw.fy,
            category: raw.category,
            months: raw.months,
        }
    }
}

/// Column spellings follow the exported sheet, typos included.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawFulfillment {
    #[serde(rename = "Orders")]
    order: String,
    #[serde(rename = "SKU")]
    sku: String,
    #[serde(rename = "Required Quantity")]
    required: String,
    #[serde(rename = "Fullfilled Quantity")]
    fulfilled: String,
    #[serde(rename = "Pending Quantity")]
    pending: String,
    #[serde(rename = "ShortSales")]
    short_sales: String,
    #[serde(rename = "Order fullfillment ratio")]
    ratio: String,
}

impl CsvRow for FulfillmentRow {
    type Raw = RawFulfillment;

    fn from_raw(raw: RawFulfillment) -> Self {
        FulfillmentRow {
            required: parse_number(&raw.required),
            fulfilled: parse_number(&raw.fulfilled),
            pending: parse_number(&raw.pending),
            short_sales: parse_number(&raw.short_sales),
            ratio: parse_optional_number(&raw.ratio.replace('%', "")),
            order: raw.order,
            sku: raw.sku,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn forecast_rows_parse_leniently() {
        let csv = "\
product,SKU,Depot,Month,Actual,Fitted,Forecast,Accuracy
Wire,W-1,North,04-01-2021,100,80,0,75%
Wire,W-2,South,bad-date,oops,,12.5,
";
        let rows: Vec<ForecastRow> = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);

        assert_eq!(rows[0].sku, "W-1");
        assert_eq!(rows[0].period, Some(Period { year: 2021, month: 4 }));
        assert_eq!(rows[0].actual, 100.0);
        assert_eq!(rows[0].accuracy, 75.0);
        assert!(rows[0].has_accuracy);

        assert_eq!(rows[1].period, None);
        assert_eq!(rows[1].actual, 0.0);
        assert_eq!(rows[1].fitted, 0.0);
        assert_eq!(rows[1].forecast, 12.5);
        assert!(!rows[1].has_accuracy);
    }

    #[test]
    fn missing_columns_and_short_records_default() {
        let csv = "Customer,Financial Year,Product,Month,Sales\nAcme,FY23\n";
        let rows: Vec<LifecycleRow> = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].customer, "Acme");
        assert_eq!(rows[0].product, "");
        assert_eq!(rows[0].sales, 0.0);
    }

    #[test]
    fn short_forecast_rows_keep_their_volume() {
        let csv = "\
product,SKU,Depot,Month,Actual,Fitted,Forecast,Accuracy
Wire,W-1,North,01-01-2023,100,80,0,75%
Wire,W-1,North,02-01-2023,50,40
";
        let rows: Vec<ForecastRow> = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[1].actual, 50.0);
        assert_eq!(rows[1].fitted, 40.0);
        assert_eq!(rows[1].forecast, 0.0);
        assert!(!rows[1].has_accuracy);
        let total: f64 = rows.iter().map(|r| r.actual).sum();
        assert_eq!(total, 150.0);
    }

    #[test]
    fn shortfall_and_fulfillment_cells() {
        let csv = "\
FY,CATEGORY,Months,Shortfall in Revenue,Impactful Shortfall,SHORTFALL (PEND. SO),CLOSING STOCK,PER UNIT
FY24,Wires,05-2023,1500,1,40,10,\"Rs. 1,200\"
FY24,Lamps,06-2023,300,0,5,1,Rs. 10
";
        let rows: Vec<ShortfallRow> = load_reader(csv.as_bytes()).unwrap();
        assert!(rows[0].impactful);
        assert_eq!(rows[0].per_unit, 1200.0);
        assert!(!rows[1].impactful);

        let csv = "\
Orders,SKU,Required Quantity,Fullfilled Quantity,Pending Quantity,ShortSales,Order fullfillment ratio
SO-1,W-1,100,92,8,8,92%
SO-1,W-2,50,50,0,0,n/a
";
        let rows: Vec<FulfillmentRow> = load_reader(csv.as_bytes()).unwrap();
        assert_eq!(rows[0].ratio, Some(92.0));
        assert_eq!(rows[1].ratio, None);
    }

    #[test]
    fn load_file_reads_from_disk() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "Customer,Financial Year,Product,Month,Sales").unwrap();
        writeln!(file, "Acme,FY23,Cable,April,120.5").unwrap();

        let rows: Vec<LifecycleRow> = load_file(file.path()).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].sales, 120.5);
    }

    #[test]
    fn missing_file_is_an_open_error() {
        let err = load_file::<ForecastRow>(Path::new("/definitely/not/here.csv")).unwrap_err();
        assert!(matches!(err, LoadError::Open { .. }));
    }
}
