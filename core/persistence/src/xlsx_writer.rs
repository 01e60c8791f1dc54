//! FILENAME: core/persistence/src/xlsx_writer.rs

use crate::{PersistenceError, Sheet, Workbook};
use engine::{
    BorderStyle, BorderWeight, Borders, CellStyle, CellValue, Color, TextAlign, VerticalAlign,
};
use rust_xlsxwriter::{Format, FormatAlign, FormatBorder, Workbook as XlsxWorkbook, Worksheet};
use std::path::Path;

/// Writes the workbook to `path`.
pub fn save_xlsx(workbook: &Workbook, path: &Path) -> Result<(), PersistenceError> {
    let mut xlsx = build_xlsx(workbook)?;
    xlsx.save(path)?;
    Ok(())
}

/// Serializes the workbook to XLSX bytes in memory.
pub fn write_xlsx_buffer(workbook: &Workbook) -> Result<Vec<u8>, PersistenceError> {
    let mut xlsx = build_xlsx(workbook)?;
    Ok(xlsx.save_to_buffer()?)
}

fn build_xlsx(workbook: &Workbook) -> Result<XlsxWorkbook, PersistenceError> {
    if workbook.sheets.is_empty() {
        return Err(PersistenceError::InvalidFormat(
            "Workbook contains no sheets".to_string(),
        ));
    }

    let mut xlsx = XlsxWorkbook::new();
    for sheet in &workbook.sheets {
        let worksheet = xlsx.add_worksheet();
        write_sheet(worksheet, sheet)?;
    }
    Ok(xlsx)
}

fn write_sheet(worksheet: &mut Worksheet, sheet: &Sheet) -> Result<(), PersistenceError> {
    worksheet.set_name(&sheet.name)?;

    // Widths are already in Excel character units.
    let mut widths: Vec<(&u32, &f64)> = sheet.grid.column_widths.iter().collect();
    widths.sort_by_key(|(col, _)| **col);
    for (col, width) in widths {
        worksheet.set_column_width(*col as u16, *width)?;
    }

    let mut formats: Vec<Format> = sheet.styles.iter().map(convert_style_to_format).collect();
    if formats.is_empty() {
        formats.push(Format::new());
    }

    // Merged ranges carry the value of their top-left cell.
    for range in &sheet.grid.merged {
        let (row, col) = range.start;
        let (value, format) = match sheet.grid.get_cell(row, col) {
            Some(cell) => (&cell.value, format_for(&formats, cell.style_index)),
            None => (&CellValue::Empty, format_for(&formats, 0)),
        };
        let text = match value {
            CellValue::Text(s) => s.as_str(),
            _ => "",
        };
        worksheet.merge_range(
            range.start.0,
            range.start.1 as u16,
            range.end.0,
            range.end.1 as u16,
            text,
            format,
        )?;
        match value {
            CellValue::Number(n) => {
                worksheet.write_number_with_format(row, col as u16, *n, format)?;
            }
            CellValue::Boolean(b) => {
                worksheet.write_boolean_with_format(row, col as u16, *b, format)?;
            }
            CellValue::Text(_) | CellValue::Empty => {}
        }
    }

    // Write cells in reading order
    let mut coords: Vec<&(u32, u32)> = sheet.grid.cells.keys().collect();
    coords.sort();

    for &(row, col) in coords {
        if sheet.grid.merge_at(row, col).is_some() {
            continue;
        }
        let Some(cell) = sheet.grid.get_cell(row, col) else {
            continue;
        };
        let col = col as u16;
        let format = format_for(&formats, cell.style_index);

        match &cell.value {
            CellValue::Empty => {
                if cell.style_index > 0 {
                    worksheet.write_blank(row, col, format)?;
                }
            }
            CellValue::Number(n) => {
                worksheet.write_number_with_format(row, col, *n, format)?;
            }
            CellValue::Text(s) => {
                worksheet.write_string_with_format(row, col, s, format)?;
            }
            CellValue::Boolean(b) => {
                worksheet.write_boolean_with_format(row, col, *b, format)?;
            }
        }
    }

    Ok(())
}

/// Falls back to the default format for out-of-range indices.
fn format_for(formats: &[Format], style_index: usize) -> &Format {
    formats.get(style_index).unwrap_or(&formats[0])
}

fn convert_style_to_format(style: &CellStyle) -> Format {
    let mut format = Format::new();

    // Font settings
    if style.font.bold {
        format = format.set_bold();
    }
    if style.font.italic {
        format = format.set_italic();
    }
    format = format.set_font_size(style.font.size as f64);
    format = format.set_font_name(&style.font.family);

    // Colors
    if style.font.color != Color::black() {
        format = format.set_font_color(color_to_xlsx(&style.font.color));
    }
    if style.background != Color::white() {
        format = format.set_background_color(color_to_xlsx(&style.background));
    }

    // Horizontal alignment
    format = format.set_align(match style.text_align {
        TextAlign::Left => FormatAlign::Left,
        TextAlign::Center => FormatAlign::Center,
        TextAlign::Right => FormatAlign::Right,
        TextAlign::General => FormatAlign::General,
    });

    // Vertical alignment
    format = format.set_align(match style.vertical_align {
        VerticalAlign::Top => FormatAlign::Top,
        VerticalAlign::Middle => FormatAlign::VerticalCenter,
        VerticalAlign::Bottom => FormatAlign::Bottom,
    });

    if style.wrap_text {
        format = format.set_text_wrap();
    }

    apply_borders(format, &style.borders)
}

fn apply_borders(mut format: Format, borders: &Borders) -> Format {
    if borders.is_none() {
        return format;
    }

    if borders.is_uniform() {
        let edge = borders.top;
        return format
            .set_border(border_to_xlsx(&edge))
            .set_border_color(color_to_xlsx(&edge.color));
    }

    if borders.top.is_visible() {
        format = format
            .set_border_top(border_to_xlsx(&borders.top))
            .set_border_top_color(color_to_xlsx(&borders.top.color));
    }
    if borders.right.is_visible() {
        format = format
            .set_border_right(border_to_xlsx(&borders.right))
            .set_border_right_color(color_to_xlsx(&borders.right.color));
    }
    if borders.bottom.is_visible() {
        format = format
            .set_border_bottom(border_to_xlsx(&borders.bottom))
            .set_border_bottom_color(color_to_xlsx(&borders.bottom.color));
    }
    if borders.left.is_visible() {
        format = format
            .set_border_left(border_to_xlsx(&borders.left))
            .set_border_left_color(color_to_xlsx(&borders.left.color));
    }
    format
}

fn border_to_xlsx(edge: &BorderStyle) -> FormatBorder {
    match edge.weight {
        BorderWeight::None => FormatBorder::None,
        BorderWeight::Thin => FormatBorder::Thin,
        BorderWeight::Medium => FormatBorder::Medium,
        BorderWeight::Thick => FormatBorder::Thick,
    }
}

fn color_to_xlsx(color: &Color) -> rust_xlsxwriter::Color {
    rust_xlsxwriter::Color::RGB(color.to_rgb())
}
