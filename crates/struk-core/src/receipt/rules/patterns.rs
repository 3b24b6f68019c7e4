//! Common regex patterns for EDC receipt extraction.
//!
//! Label alternatives include the misreads OCR engines commonly produce on
//! thermal-printed slips (e.g. `TERM` read as `TERN`/`IERM`, `MERC` as `NERC`).

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    // Date/time: "DATE/TIME 01Jan,23 14:30", "DATE: 01JAN24", "TGL 12 MEI 24 09:05:11".
    // Month names may be spelled out ("Sept", "January"); a year directly
    // followed by `:` is the hour of a yearless token and never matches.
    pub static ref DATE_TIME_LABELED: Regex = Regex::new(
        r"(?i)((?:DATE\s*/\s*TIME|DATE|TGL|TANGGAL)\s*[:.]?\s*\d{1,2}\s*(?:JAN|FEB|MAR|APR|MAY|MEI|JUN|JUL|AUG|AGU|AGT|SEP|OCT|OKT|NOV|DEC|DES)[A-Z]*\.?\s*[,.]?\s*(?:\d{4}|\d{2})(?:\s+\d{1,2}[:.]\d{2}(?::\d{2})?)?)(?:[^\d:.]|\.(?:\D|$)|$)"
    ).unwrap();

    pub static ref DATE_TIME_BARE: Regex = Regex::new(
        r"(?i)\b(\d{1,2}\s*(?:JAN|FEB|MAR|APR|MAY|MEI|JUN|JUL|AUG|AGU|AGT|SEP|OCT|OKT|NOV|DEC|DES)[A-Z]*\.?\s*[,.]?\s*(?:\d{4}|\d{2})(?:\s+\d{1,2}[:.]\d{2}(?::\d{2})?)?)(?:[^\d:.]|\.(?:\D|$)|$)"
    ).unwrap();

    pub static ref DATE_TIME_LABEL_PREFIX: Regex = Regex::new(
        r"(?i)^\s*(?:DATE\s*/\s*TIME|DATE|TGL|TANGGAL)\s*[:.]?\s*"
    ).unwrap();

    // Components of a single date/time token; month group holds the first three letters
    pub static ref DATE_TOKEN: Regex = Regex::new(
        r"(?i)(\d{1,2})\s*(JAN|FEB|MAR|APR|MAY|MEI|JUN|JUL|AUG|AGU|AGT|SEP|OCT|OKT|NOV|DEC|DES)[A-Z]*\.?\s*[,.]?\s*(\d{4}|\d{2})(?:\s+(\d{1,2})[:.](\d{2})(?::(\d{2}))?)?(?:[^\d:.]|\.(?:\D|$)|$)"
    ).unwrap();

    // Terminal and merchant identifiers, usually printed on one line
    pub static ref TERMINAL_MERCHANT_LINE: Regex = Regex::new(
        r"(?i)\b(?:TERM(?:INAL)?|TERN|FERM|FERN|TEAM|IERM|1ERM|TID)(?:\s*ID)?[\s#:.]*([A-Z0-9]*\d[A-Z0-9]*)\s+(?:MERC(?:HANT)?|MERE|NERC|HERC|MFRC|MID)(?:\s*ID)?[\s#:.]*(\d+)"
    ).unwrap();

    pub static ref TERMINAL_ID: Regex = Regex::new(
        r"(?i)\b(?:TERM(?:INAL)?|TERN|FERM|FERN|TEAM|IERM|1ERM|TID)(?:\s*ID)?[\s#:.]*([A-Z0-9]*\d[A-Z0-9]*)"
    ).unwrap();

    pub static ref MERCHANT_ID: Regex = Regex::new(
        r"(?i)\b(?:MERC(?:HANT)?|MERE|NERC|HERC|MFRC|MID)(?:\s*ID)?[\s#:.]*(\d+)"
    ).unwrap();

    // Card type / payment channel
    pub static ref CARD_TYPE_LABELED: Regex = Regex::new(
        r"(?i)CARD\s*TYPE[\s:.]*((?:(?:DEBIT|CREDIT|KREDIT)\s+)?(?:MC|MASTER\s*CARD|VISA|BCA|GPN|JCB|AMEX|FLAZZ)(?:[\s/]*(?:DEBIT|CREDIT|KREDIT))?(?:[\s/(]*(?:DIP|FLY|TAP|SWIPE|CHIP|CONTACTLESS)\)?)?)"
    ).unwrap();

    pub static ref CARD_TYPE_DEBIT: Regex = Regex::new(
        r"(?i)\b(DEBIT\s+(?:BCA|MC|MASTER\s*CARD|VISA|GPN|MANDIRI|BNI|BRI))\b"
    ).unwrap();

    // Masked PAN: ************1234
    pub static ref CARD_NUMBER_MASKED: Regex = Regex::new(
        r"(\*{6,}\d{4})\b"
    ).unwrap();

    // Host reference numbers: "REF NO : 4012", "REF.NO. 4012", "APPR.CODE 123456"
    pub static ref BATCH_NUMBER: Regex = Regex::new(
        r"(?i)\bBATCH[\s.]*(?:NO|NUM(?:BER)?)?[\s#:.]*(\d+)"
    ).unwrap();

    pub static ref TRACE_NUMBER: Regex = Regex::new(
        r"(?i)\bTRACE[\s.]*(?:NO|NUM(?:BER)?)?[\s#:.]*(\d+)"
    ).unwrap();

    pub static ref APPROVAL_CODE: Regex = Regex::new(
        r"(?i)\b(?:APPR(?:OVAL)?|APP|AUTH)[\s.]*(?:CODE|CD|NO)?[\s#:.]*(\d+)"
    ).unwrap();

    pub static ref REFERENCE_NUMBER: Regex = Regex::new(
        r"(?i)\bREF(?:ERENCE)?[\s.]*(?:NO|NUM(?:BER)?)?[\s#:.]*(\d+)"
    ).unwrap();

    // Amounts (dot thousands, comma decimals): "TOTAL Rp 15.000,50", "TOTAL -Rp. 5.000,00"
    pub static ref TOTAL_LABELED: Regex = Regex::new(
        r"(?i)\b(?:TOTAL|TOTAI|T0TAL|TOTA1|JUMLAH)[\s:.]*(-?\s*(?:RP|IDR)\.?\s*\d[\d.,]*)"
    ).unwrap();

    pub static ref TOTAL_NEGATIVE: Regex = Regex::new(
        r"(?i)(-\s*(?:RP|IDR)\.?\s*\d[\d.,]*)"
    ).unwrap();

    // Any currency-marked amount, labeled or not
    pub static ref AMOUNT_ANY: Regex = Regex::new(
        r"(?i)(-?\s*\b(?:RP|IDR)\.?\s*\d[\d.,]*)"
    ).unwrap();

    // Software/build reference printed in the footer: "V12A/ANS1234",
    // "12345678/ABCD1234" or a bare "ANS1234"
    pub static ref INTERNAL_CODE_REFERENCE: Regex = Regex::new(
        r"(?i)\b([A-Z0-9]+/ANS[A-Z0-9]*|[A-Z0-9]{4,}/[A-Z0-9]{4,}|ANS[A-Z0-9]*\d[A-Z0-9]*)\b"
    ).unwrap();

    // Street address line
    pub static ref MERCHANT_ADDRESS: Regex = Regex::new(
        r"(?im)^[ \t]*((?:JL|JLN|JALAN)\b\.?[^\r\n]*)"
    ).unwrap();

    // Merchant-name blacklist: address prefixes, ID-like tokens, masked PANs,
    // slip boilerplate and field label lines.
    pub static ref MERCHANT_EXCLUSION: Regex = Regex::new(
        r"(?ix)
        ^(?:JL|JLN|JALAN|GG|GANG|KEL|KEC|KAB|KOTA|DESA|RT|RW|BLOK|BLK|NO|KOMP|KOMPLEK|RUKO|KM)\b
        | \b(?:BLOK|BLOCK|NO)\.?\s*[A-Z]?\d+
        | \d{10,}
        | ^[A-Z]{0,3}\d{5,}[A-Z0-9]*$
        | \*{3,}
        | SIGNATURE\s+NOT\s+REQUIRED | NO\s+SIGNATURE | CARDHOLDER\s+COPY | CUSTOMER\s+COPY
        | MERCHANT\s+COPY | BANK\s+COPY | I\s+AGREE\s+TO\s+PAY | TERIMA\s*KASIH | THANK\s*YOU
        | ^(?:TERM|TERN|FERM|FERN|TID|MERC|MID|BATCH|TRACE|REF|APPR|AUTH|DATE|TIME|TGL|CARD\s*TYPE|TOTAL|SALE|VOID|BASE)\b
        "
    ).unwrap();

    // First-line heuristic cleanup
    pub static ref MID_PREFIX: Regex = Regex::new(
        r"(?i)^MID\s*:\s*[\d\s-]+\s*-\s*"
    ).unwrap();

    pub static ref DATE_SUFFIX: Regex = Regex::new(
        r"(?i)\s*DATE\s*:.*$"
    ).unwrap();

    pub static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
}
