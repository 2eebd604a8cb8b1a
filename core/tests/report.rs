//! PDF report rendering tests.

use invoice_roi_core::{
    calculator::RoiCalculator,
    report::{render_pdf, render_scenario, ReportDocument},
    scenario::{Scenario, SimulationInput},
};

fn scenario(name: &str, cost: f64) -> Scenario {
    let inputs = SimulationInput {
        monthly_invoice_volume:       1000,
        num_ap_staff:                 3,
        avg_hours_per_invoice:        0.1,
        hourly_wage:                  25.0,
        error_rate_manual:            5.0,
        error_cost:                   20.0,
        time_horizon_months:          12,
        one_time_implementation_cost: cost,
    };
    let results = RoiCalculator::default().compute(&inputs);
    Scenario { id: 7, scenario_name: name.into(), inputs, results }
}

fn contains(haystack: &[u8], needle: &str) -> bool {
    haystack.windows(needle.len()).any(|w| w == needle.as_bytes())
}

/// Verify the PDF framing and that startxref points at the xref table.
#[test]
fn pdf_has_header_trailer_and_valid_xref_offset() {
    let bytes = render_pdf(&ReportDocument::from(&scenario("Baseline", 2000.0))).unwrap();

    assert!(bytes.starts_with(b"%PDF-1.4\n"));
    assert!(bytes.ends_with(b"%%EOF\n"));

    let text = String::from_utf8_lossy(&bytes);
    let startxref = text.rfind("startxref\n").expect("startxref");
    let offset: usize = text[startxref + "startxref\n".len()..]
        .lines()
        .next()
        .unwrap()
        .parse()
        .unwrap();
    assert!(bytes[offset..].starts_with(b"xref\n"));
}

/// Verify that every stored figure appears in the document as rounded upstream.
#[test]
fn pdf_renders_every_field_with_upstream_rounding() {
    let bytes = render_pdf(&ReportDocument::from(&scenario("Baseline", 2000.0))).unwrap();

    for expected in [
        "(Invoicing Automation ROI Report)",
        "(Scenario: Baseline)",
        "Monthly Invoice Volume: 1,000)",
        "AP Staff Count: 3)",
        "Average Hours per Invoice: 0.10)",
        "Average Hourly Wage: $25.00)",
        "Manual Error Rate: 5.0%)",
        "Cost per Error: $20.00)",
        "Time Horizon: 12 months)",
        "Implementation Cost: $2,000.00)",
        "Monthly Savings: $3,608.00)",
        "Total Savings \\(12 months\\): $43,296.00)",
        "Net Savings: $41,296.00)",
        "Payback Period: 0.6 months)",
        "Return on Investment \\(ROI\\): 2,064.8%)",
    ] {
        assert!(contains(&bytes, expected), "missing {expected:?}");
    }
}

/// Verify that an infinite ROI is printed as text rather than a number.
#[test]
fn unbounded_roi_renders_as_text() {
    let bytes = render_pdf(&ReportDocument::from(&scenario("Free", 0.0))).unwrap();
    assert!(contains(&bytes, "Return on Investment \\(ROI\\): Unbounded)"));
    assert!(contains(&bytes, "Payback Period: 0.0 months)"));
}

/// Verify that scenario names are escaped in the content stream and sanitized in the filename.
#[test]
fn scenario_name_is_escaped_in_document_and_sanitized_in_filename() {
    let rendered = render_scenario(&scenario("Plan (v2)", 2000.0)).unwrap();
    assert_eq!(rendered.filename, "ROI_Report_Plan__v2_.pdf");
    assert!(contains(&rendered.bytes, "(Scenario: Plan \\(v2\\))"));
}

/// Verify that rendering one scenario twice gives identical bytes.
#[test]
fn rendering_is_deterministic() {
    let s = scenario("Repeat", 2000.0);
    assert_eq!(render_scenario(&s).unwrap().bytes, render_scenario(&s).unwrap().bytes);
}
