use anyhow::Result;

fn main() -> Result<()> {
    let mut book = umya_spreadsheet::new_file();
    book.new_sheet("Datos")
        .map_err(|e| anyhow::anyhow!("cannot add sheet: {e}"))?;

    let sheet = book
        .get_sheet_by_name_mut("Datos")
        .ok_or_else(|| anyhow::anyhow!("sheet Datos missing"))?;

    // Ten columns of data from row 34, closed by the sentinel at A40.
    for row in 34..40u32 {
        for col in 1..=10u32 {
            sheet
                .get_cell_mut((col, row))
                .set_value(format!("r{row}c{col}"));
        }
    }
    sheet.get_cell_mut("A40").set_value("*/");

    umya_spreadsheet::writer::xlsx::write(&book, "sample.xlsx")?;
    println!("Wrote sample.xlsx");
    Ok(())
}
