//! PDF report renderer.
//!
//! RULE: Pure formatting. The renderer prints the stored figures as they
//! are; it never recomputes or re-rounds a result.
//!
//! Output is a single-page PDF 1.4 document using the standard Type 1
//! Helvetica faces with WinAnsi encoding, so no font data is embedded.

use std::io::Write;

use crate::{
    error::{RoiError, RoiResult},
    scenario::{Scenario, SimulationInput, SimulationResult},
};

const PAGE_WIDTH: f64 = 595.0; // A4, points
const PAGE_HEIGHT: f64 = 842.0;
const MARGIN_LEFT: f64 = 56.0;

pub const REPORT_TITLE: &str = "Invoicing Automation ROI Report";
const FOOTER: &str = "Thank you for using the Invoicing ROI Simulator!";

/// Everything the renderer needs. Built from a stored scenario.
#[derive(Debug, Clone, Copy)]
pub struct ReportDocument<'a> {
    pub scenario_name: &'a str,
    pub inputs:        &'a SimulationInput,
    pub results:       &'a SimulationResult,
}

impl<'a> From<&'a Scenario> for ReportDocument<'a> {
    fn from(scenario: &'a Scenario) -> Self {
        Self {
            scenario_name: &scenario.scenario_name,
            inputs:        &scenario.inputs,
            results:       &scenario.results,
        }
    }
}

/// A rendered report ready to stream as an attachment.
#[derive(Debug, Clone)]
pub struct RenderedReport {
    pub filename: String,
    pub bytes:    Vec<u8>,
}

#[derive(Debug, Clone, Copy)]
enum Face {
    Regular,
    Bold,
    Italic,
}

impl Face {
    fn resource(self) -> &'static str {
        match self {
            Face::Regular => "F1",
            Face::Bold    => "F2",
            Face::Italic  => "F3",
        }
    }
}

/// Accumulates text-drawing operators for one page, top to bottom.
struct PageBuilder {
    ops: Vec<u8>,
    y:   f64,
}

impl PageBuilder {
    fn new() -> Self {
        Self { ops: Vec::new(), y: PAGE_HEIGHT - 72.0 }
    }

    fn line(&mut self, face: Face, size: f64, text: &str, advance: f64) -> RoiResult<()> {
        self.text_at(face, size, MARGIN_LEFT, self.y, text)?;
        self.y -= advance;
        Ok(())
    }

    fn gap(&mut self, points: f64) {
        self.y -= points;
    }

    fn text_at(&mut self, face: Face, size: f64, x: f64, y: f64, text: &str) -> RoiResult<()> {
        write!(self.ops, "BT /{} {size} Tf {x:.2} {y:.2} Td (", face.resource()).map_err(render_io)?;
        self.ops.extend(encode_pdf_text(text));
        self.ops.extend_from_slice(b") Tj ET\n");
        Ok(())
    }
}

fn render_io(e: std::io::Error) -> RoiError {
    RoiError::Render(e.to_string())
}

/// Latin-1 bytes with PDF string escapes. Characters outside Latin-1
/// become `?`; control characters become spaces.
fn encode_pdf_text(text: &str) -> Vec<u8> {
    let mut out = Vec::with_capacity(text.len());
    for ch in text.chars() {
        match ch {
            '(' | ')' | '\\' => {
                out.push(b'\\');
                out.push(ch as u8);
            }
            c if (c as u32) < 0x20 => out.push(b' '),
            c if (c as u32) <= 0xFF => out.push(c as u32 as u8),
            _ => out.push(b'?'),
        }
    }
    out
}

/// `1234567.5` -> `1,234,567`; operates on the integer part of a
/// pre-formatted decimal string.
fn group_thousands(formatted: &str) -> String {
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (formatted, None),
    };
    let digits: Vec<char> = int_part.chars().collect();
    let mut grouped = String::with_capacity(formatted.len() + digits.len() / 3);
    for (i, d) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*d);
    }
    if let Some(f) = frac_part {
        grouped.push('.');
        grouped.push_str(f);
    }
    grouped
}

/// `$1,234.56`, with a leading minus for negative amounts.
pub fn format_currency(value: f64) -> String {
    let body = group_thousands(&format!("{:.2}", value.abs()));
    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-${body}")
    } else {
        format!("${body}")
    }
}

/// One decimal with thousands separators; `Unbounded` for infinity.
pub fn format_one_decimal(value: f64) -> String {
    if value.is_infinite() {
        return if value > 0.0 { "Unbounded".into() } else { "-Unbounded".into() };
    }
    let body = group_thousands(&format!("{:.1}", value.abs()));
    if value < 0.0 && body.chars().any(|c| c.is_ascii_digit() && c != '0') {
        format!("-{body}")
    } else {
        body
    }
}

pub fn format_percent(value: f64) -> String {
    if value.is_infinite() {
        format_one_decimal(value)
    } else {
        format!("{}%", format_one_decimal(value))
    }
}

/// `ROI_Report_<name>.pdf` with anything outside `[A-Za-z0-9_.-]`
/// replaced, so the name is safe inside a Content-Disposition header.
pub fn report_filename(scenario_name: &str) -> String {
    let safe: String = scenario_name
        .trim()
        .chars()
        .map(|c| if c.is_ascii_alphanumeric() || matches!(c, '_' | '.' | '-') { c } else { '_' })
        .collect();
    format!("ROI_Report_{safe}.pdf")
}

fn page_content(doc: &ReportDocument<'_>) -> RoiResult<Vec<u8>> {
    let inputs = doc.inputs;
    let results = doc.results;
    let mut page = PageBuilder::new();

    page.line(Face::Bold, 16.0, REPORT_TITLE, 30.0)?;
    page.line(Face::Bold, 14.0, &format!("Scenario: {}", doc.scenario_name), 24.0)?;

    // ── Inputs ─────────────────────────────────────────────────
    page.line(Face::Bold, 12.0, "Your Business Inputs", 18.0)?;
    let input_lines = [
        format!("  - Monthly Invoice Volume: {}", group_thousands(&inputs.monthly_invoice_volume.to_string())),
        format!("  - AP Staff Count: {}", inputs.num_ap_staff),
        format!("  - Average Hours per Invoice: {:.2}", inputs.avg_hours_per_invoice),
        format!("  - Average Hourly Wage: {}", format_currency(inputs.hourly_wage)),
        format!("  - Manual Error Rate: {}", format_percent(inputs.error_rate_manual)),
        format!("  - Cost per Error: {}", format_currency(inputs.error_cost)),
        format!("  - Time Horizon: {} months", inputs.time_horizon_months),
        format!("  - Implementation Cost: {}", format_currency(inputs.one_time_implementation_cost)),
    ];
    for text in &input_lines {
        page.line(Face::Regular, 10.0, text, 14.0)?;
    }
    page.gap(16.0);

    // ── Results ────────────────────────────────────────────────
    page.line(Face::Bold, 12.0, "Projected Savings & ROI", 18.0)?;
    page.line(Face::Regular, 10.0, &format!("  - Monthly Savings: {}", format_currency(results.monthly_savings)), 15.0)?;
    page.line(
        Face::Regular,
        10.0,
        &format!(
            "  - Total Savings ({} months): {}",
            inputs.time_horizon_months,
            format_currency(results.cumulative_savings)
        ),
        15.0,
    )?;
    page.line(Face::Regular, 10.0, &format!("  - Net Savings: {}", format_currency(results.net_savings)), 15.0)?;
    page.line(
        Face::Bold,
        11.0,
        &format!("  - Payback Period: {} months", format_one_decimal(results.payback_months)),
        15.0,
    )?;
    page.line(
        Face::Bold,
        11.0,
        &format!("  - Return on Investment (ROI): {}", format_percent(results.roi_percentage)),
        15.0,
    )?;

    // Approximate centering: Helvetica averages about half an em per glyph.
    let footer_width = FOOTER.len() as f64 * 8.0 * 0.5;
    page.text_at(Face::Italic, 8.0, (PAGE_WIDTH - footer_width) / 2.0, 40.0, FOOTER)?;

    Ok(page.ops)
}

/// Render a single-page PDF for `doc`.
pub fn render_pdf(doc: &ReportDocument<'_>) -> RoiResult<Vec<u8>> {
    let content = page_content(doc)?;

    let mut objects: Vec<Vec<u8>> = vec![
        b"<< /Type /Catalog /Pages 2 0 R >>".to_vec(),
        b"<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_vec(),
        format!(
            "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 {PAGE_WIDTH} {PAGE_HEIGHT}] \
             /Resources << /Font << /F1 5 0 R /F2 6 0 R /F3 7 0 R >> >> /Contents 4 0 R >>"
        )
        .into_bytes(),
    ];
    let mut stream = format!("<< /Length {} >>\nstream\n", content.len()).into_bytes();
    stream.extend_from_slice(&content);
    stream.extend_from_slice(b"endstream");
    objects.push(stream);
    for base_font in ["Helvetica", "Helvetica-Bold", "Helvetica-Oblique"] {
        objects.push(
            format!("<< /Type /Font /Subtype /Type1 /BaseFont /{base_font} /Encoding /WinAnsiEncoding >>")
                .into_bytes(),
        );
    }

    let mut out: Vec<u8> = Vec::new();
    out.extend_from_slice(b"%PDF-1.4\n%\xE2\xE3\xCF\xD3\n");

    let mut offsets = Vec::with_capacity(objects.len());
    for (i, body) in objects.iter().enumerate() {
        offsets.push(out.len());
        write!(out, "{} 0 obj\n", i + 1).map_err(render_io)?;
        out.extend_from_slice(body);
        out.extend_from_slice(b"\nendobj\n");
    }

    let xref_at = out.len();
    write!(out, "xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1).map_err(render_io)?;
    for offset in &offsets {
        write!(out, "{offset:010} 00000 n \n").map_err(render_io)?;
    }
    write!(
        out,
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{xref_at}\n%%EOF\n",
        objects.len() + 1
    )
    .map_err(render_io)?;

    Ok(out)
}

/// Render a stored scenario and name the attachment after it.
pub fn render_scenario(scenario: &Scenario) -> RoiResult<RenderedReport> {
    let bytes = render_pdf(&ReportDocument::from(scenario))?;
    Ok(RenderedReport {
        filename: report_filename(&scenario.scenario_name),
        bytes,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn currency_has_grouping_and_two_decimals() {
        assert_eq!(format_currency(3608.0), "$3,608.00");
        assert_eq!(format_currency(1234567.891), "$1,234,567.89");
        assert_eq!(format_currency(0.5), "$0.50");
        assert_eq!(format_currency(-41296.0), "-$41,296.00");
        assert_eq!(format_currency(-0.001), "$0.00");
    }

    #[test]
    fn one_decimal_formats() {
        assert_eq!(format_one_decimal(0.6), "0.6");
        assert_eq!(format_percent(2064.8), "2,064.8%");
        assert_eq!(format_percent(f64::INFINITY), "Unbounded");
        assert_eq!(format_percent(-12.5), "-12.5%");
    }

    #[test]
    fn pdf_text_is_escaped_and_latin1() {
        assert_eq!(encode_pdf_text("a(b)c\\"), b"a\\(b\\)c\\\\".to_vec());
        assert_eq!(encode_pdf_text("caf\u{e9}"), vec![b'c', b'a', b'f', 0xE9]);
        assert_eq!(encode_pdf_text("\u{20ac}5"), b"?5".to_vec());
        assert_eq!(encode_pdf_text("a\nb"), b"a b".to_vec());
    }

    #[test]
    fn filename_is_header_safe() {
        assert_eq!(report_filename("Q3 plan"), "ROI_Report_Q3_plan.pdf");
        assert_eq!(report_filename("a\"b/c"), "ROI_Report_a_b_c.pdf");
        assert_eq!(report_filename("base-2024.v1"), "ROI_Report_base-2024.v1.pdf");
    }
}
