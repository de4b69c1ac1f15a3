use std::fs;

use anyhow::Context;
use log::info;
use rust_xlsxwriter::{Format, Workbook};

use crate::config::OutputSettings;
use crate::record::AddressRecord;

/// Write all records to the configured workbook path.
///
/// A pre-existing file at the path is removed first; when removal fails
/// the run is aborted and no workbook is written. The file is always
/// rewritten in full.
pub fn write_workbook(records: &[AddressRecord], output: &OutputSettings) -> anyhow::Result<()> {
    let path = output.target_path();
    if path.exists() {
        info!("removing existing output file [{}]", path.display());
        fs::remove_file(&path)
            .with_context(|| format!("cannot remove existing output file [{}]", path.display()))?;
    }
    if !output.directory.exists() {
        fs::create_dir_all(&output.directory).with_context(|| {
            format!(
                "cannot create output directory [{}]",
                output.directory.display()
            )
        })?;
    }

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(&output.sheet_name)?;

    let columns = &output.columns;
    let header = [
        &columns.province,
        &columns.city,
        &columns.county,
        &columns.address,
        &columns.full_address,
        &columns.full_json,
    ];
    let bold = Format::new().set_bold();
    for (col, name) in header.iter().enumerate() {
        worksheet.write_string_with_format(0, col as u16, *name, &bold)?;
    }

    for (i, record) in records.iter().enumerate() {
        let row = (i + 1) as u32;
        worksheet.write_string(row, 0, &record.province)?;
        worksheet.write_string(row, 1, &record.city)?;
        worksheet.write_string(row, 2, &record.county)?;
        worksheet.write_string(row, 3, &record.address)?;
        worksheet.write_string(row, 4, &record.full_address)?;
        worksheet.write_string(row, 5, serde_json::to_string(&record.full_json)?)?;
    }

    info!(
        "writing [{}] rows to output file [{}]",
        records.len(),
        path.display()
    );
    workbook.save(&path)
        .with_context(|| format!("cannot write output file [{}]", path.display()))?;
    Ok(())
}
