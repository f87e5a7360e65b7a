//! Regex patterns shared by the field extraction rules.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Invoice number: 3-5 letters followed by 6-8 digits (e.g. ABC123456).
    // No boundary anchors, so embedded matches count.
    pub static ref INVOICE_NUMBER: Regex = Regex::new(
        r"(?i)([A-Z]{3,5}\d{6,8})"
    ).unwrap();

    // Euro amount: sign, at most one whitespace, digits with optional
    // comma grouping and exactly two fraction digits. Group 1 drops the
    // sign and keeps the commas.
    pub static ref EURO_AMOUNT: Regex = Regex::new(
        r"€\s?([\d,]+\.\d{2})"
    ).unwrap();

    // Labeled due date as DD/MM/YYYY, digits only, no calendar check
    pub static ref DUE_DATE: Regex = Regex::new(
        r"(?i)Due Date[:\s]*(\d{2}/\d{2}/\d{4})"
    ).unwrap();

    // Standalone word "Paid" in any casing
    pub static ref PAID_WORD: Regex = Regex::new(
        r"(?i)\bPaid\b"
    ).unwrap();
}
