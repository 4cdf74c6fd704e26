use crate::error::Result;
use crate::models::BudgetReport;
use std::path::Path;

const HEADER: [&str; 9] = [
    "requested",
    "normalized",
    "quantity",
    "matched",
    "product_id",
    "product_name",
    "unit_price",
    "score",
    "line_amount",
];

/// 导出预算报告为 CSV，末行为总价
pub fn export_to_csv(report: &BudgetReport, output_path: &Path) -> Result<()> {
    use csv::Writer;
    use std::fs::File;

    let file = File::create(output_path)?;
    let mut writer = Writer::from_writer(file);
    writer.write_record(HEADER)?;

    for item in report.items() {
        let product = item.catalog_entry.as_ref();
        writer.write_record(&[
            item.original_line.clone(),
            item.normalized_name.clone(),
            item.quantity.to_string(),
            item.matched.to_string(),
            option_to_csv(&product.map(|p| p.id)),
            option_to_csv(&product.map(|p| p.name.clone())),
            option_to_csv(&product.map(|p| p.unit_price.with_scale(2))),
            option_to_csv(&item.similarity_score.map(|s| format!("{s:.4}"))),
            option_to_csv(&item.line_amount.as_ref().map(|a| a.with_scale(2))),
        ])?;
    }

    let total = report.total().with_scale(2).to_string();
    writer.write_record(["TOTAL", "", "", "", "", "", "", "", total.as_str()])?;

    writer.flush()?;
    tracing::info!("导出 {} 行到 {}", report.items().len(), output_path.display());
    Ok(())
}

fn option_to_csv<T: ToString>(opt: &Option<T>) -> String {
    opt.as_ref().map(|v| v.to_string()).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine;
    use crate::models::CatalogEntry;
    use bigdecimal::BigDecimal;
    use std::str::FromStr;

    #[test]
    fn writes_header_rows_and_total() {
        let catalog = vec![CatalogEntry::new(1, "Caneta", BigDecimal::from_str("2.50").unwrap())];
        let report = engine::process(["3x Caneta Azul", "Xilofone"], &catalog).unwrap();

        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("budget.csv");
        export_to_csv(&report, &path).unwrap();

        let mut reader = csv::Reader::from_path(&path).unwrap();
        let headers = reader.headers().unwrap().clone();
        assert_eq!(headers.iter().collect::<Vec<_>>(), HEADER.to_vec());

        let rows: Vec<csv::StringRecord> = reader.records().map(|r| r.unwrap()).collect();
        assert_eq!(rows.len(), 3);
        assert_eq!(&rows[0][0], "3x Caneta Azul");
        assert_eq!(&rows[0][2], "3");
        assert_eq!(&rows[0][3], "true");
        assert_eq!(&rows[0][5], "Caneta");
        assert_eq!(&rows[0][8], "7.50");
        assert_eq!(&rows[1][3], "false");
        assert_eq!(&rows[1][4], "");
        assert_eq!(&rows[2][0], "TOTAL");
        assert_eq!(&rows[2][8], "7.50");
    }
}
