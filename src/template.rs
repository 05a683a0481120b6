use std::borrow::Cow;

use chrono::{Datelike, NaiveDate};

use crate::models::{Detail, Organization};

pub const ORG_NAME: &[u8] = b"{ORG_NAME}";
pub const ORG_IDNO: &[u8] = b"{ORG_IDNO}";
pub const ORG_ADDR: &[u8] = b"{ORG_ADDR}";
pub const ORG_PHONE: &[u8] = b"{ORG_PHONE}";
pub const SERIA: &[u8] = b"{SERIA}";
pub const NUMBER: &[u8] = b"{NUMBER}";
pub const DATE_DAY: &[u8] = b"{DATE_DAY}";
pub const DATE_MONTH: &[u8] = b"{DATE_MONTH}";
pub const DATE_YEAR: &[u8] = b"{DATE_YEAR}";
pub const CAR_MODEL: &[u8] = b"{CAR_MODEL}";
pub const CAR_NUMBER: &[u8] = b"{CAR_NUMBER}";
pub const DRIVER_NAME: &[u8] = b"{DRIVER_NAME}";

const TOKEN_START: u8 = b'{';

/// Values for every placeholder of a single document.
#[derive(Debug, Clone)]
pub struct Substitutions<'a> {
    pairs: [(&'static [u8], Cow<'a, [u8]>); 12],
}

impl<'a> Substitutions<'a> {
    pub fn new(org: &'a Organization, detail: &'a Detail, date: NaiveDate) -> Self {
        let field = |s: &'a Vec<u8>| Cow::Borrowed(s.as_slice());
        let owned = |s: String| Cow::Owned(s.into_bytes());
        Self {
            pairs: [
                (ORG_NAME, field(org.name())),
                (ORG_IDNO, field(org.idno())),
                (ORG_ADDR, field(org.address())),
                (ORG_PHONE, field(org.phone())),
                (SERIA, field(detail.series())),
                (NUMBER, field(detail.number())),
                (DATE_DAY, owned(date.day().to_string())),
                (DATE_MONTH, owned(date.month().to_string())),
                (DATE_YEAR, owned(format!("{:04}", date.year()))),
                (CAR_MODEL, field(detail.car_model())),
                (CAR_NUMBER, field(detail.car_number())),
                (DRIVER_NAME, field(detail.driver_name())),
            ],
        }
    }

    fn lookup(&self, rest: &[u8]) -> Option<(usize, &[u8])> {
        self.pairs
            .iter()
            .find(|(token, _)| rest.starts_with(token))
            .map(|(token, value)| (token.len(), &**value))
    }
}

/// Template content loaded once and never mutated.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Template {
    raw: Vec<u8>,
}

impl Template {
    pub fn new(raw: Vec<u8>) -> Self {
        Self { raw }
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.raw
    }

    /// Renders the template into `buf`, which is cleared first.
    ///
    /// Tokens are matched in one pass over the template bytes, so text
    /// coming from a substituted value is never scanned again.
    pub fn render_into(&self, subs: &Substitutions<'_>, buf: &mut Vec<u8>) {
        buf.clear();
        buf.reserve(self.raw.len());

        let mut pos = 0;
        while pos < self.raw.len() {
            let Some(offset) = self.raw[pos..].iter().position(|b| *b == TOKEN_START) else {
                buf.extend_from_slice(&self.raw[pos..]);
                break;
            };
            let start = pos + offset;
            buf.extend_from_slice(&self.raw[pos..start]);

            match subs.lookup(&self.raw[start..]) {
                Some((len, value)) => {
                    buf.extend_from_slice(value);
                    pos = start + len;
                }
                None => {
                    buf.push(TOKEN_START);
                    pos = start + 1;
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const ALL_TOKENS: [&[u8]; 12] = [
        ORG_NAME,
        ORG_IDNO,
        ORG_ADDR,
        ORG_PHONE,
        SERIA,
        NUMBER,
        DATE_DAY,
        DATE_MONTH,
        DATE_YEAR,
        CAR_MODEL,
        CAR_NUMBER,
        DRIVER_NAME,
    ];

    fn acme() -> Organization {
        Organization::new("Acme", "acme", "123", "1 Main St", "555-0100")
    }

    fn jane() -> Detail {
        Detail::new("A", "001", "Truck", "XYZ-1", "Jane Doe")
    }

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    impl Template {
        fn render(&self, subs: &Substitutions<'_>) -> Vec<u8> {
            let mut buf = Vec::new();
            self.render_into(subs, &mut buf);
            buf
        }
    }

    fn contains(haystack: &[u8], needle: &[u8]) -> bool {
        haystack.windows(needle.len()).any(|w| w == needle)
    }

    #[test]
    fn test_substitutes_every_token() {
        let tpl = Template::new(
            b"{ORG_NAME}|{ORG_IDNO}|{ORG_ADDR}|{ORG_PHONE}|{SERIA}|{NUMBER}|\
              {DATE_DAY}.{DATE_MONTH}.{DATE_YEAR}|{CAR_MODEL}|{CAR_NUMBER}|{DRIVER_NAME}"
                .to_vec(),
        );
        let (org, detail) = (acme(), jane());
        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 3, 7)));
        assert_eq!(
            String::from_utf8_lossy(&out),
            "Acme|123|1 Main St|555-0100|A|001|7.3.2026|Truck|XYZ-1|Jane Doe"
        );
        for token in ALL_TOKENS {
            assert!(!contains(&out, token));
        }
    }

    #[test]
    fn test_date_parts_are_unpadded() {
        let tpl = Template::new(b"{DATE_DAY}/{DATE_MONTH}/{DATE_YEAR}".to_vec());
        let (org, detail) = (acme(), jane());

        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 1, 5)));
        assert_eq!(out, b"5/1/2026");

        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 12, 31)));
        assert_eq!(out, b"31/12/2026");
    }

    #[test]
    fn test_repeated_tokens_are_all_replaced() {
        let tpl = Template::new(b"{DRIVER_NAME} and {DRIVER_NAME} again".to_vec());
        let (org, detail) = (acme(), jane());
        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 1, 1)));
        assert_eq!(out, b"Jane Doe and Jane Doe again");
    }

    #[test]
    fn test_unknown_braces_pass_through() {
        let tpl = Template::new(b"<style>p{color:red}</style>{ORG_NAM}{{ORG_NAME}}{".to_vec());
        let (org, detail) = (acme(), jane());
        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 1, 1)));
        assert_eq!(out, b"<style>p{color:red}</style>{ORG_NAM}{Acme}{".as_slice());
    }

    #[test]
    fn test_template_without_tokens_is_copied() {
        let tpl = Template::new(b"<html><body>static</body></html>".to_vec());
        let (org, detail) = (acme(), jane());
        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 1, 1)));
        assert_eq!(out, tpl.as_bytes());
    }

    #[test]
    fn test_token_inside_value_is_left_verbatim() {
        let tpl = Template::new(b"{ORG_NAME} / {DRIVER_NAME}".to_vec());
        let org = Organization::new("{DRIVER_NAME} Ltd", "x", "1", "a", "p");
        let detail = jane();
        let out = tpl.render(&Substitutions::new(&org, &detail, date(2026, 1, 1)));
        assert_eq!(out, b"{DRIVER_NAME} Ltd / Jane Doe".as_slice());
        assert!(contains(&out, DRIVER_NAME));
    }

    #[test]
    fn test_render_into_resets_buffer() {
        let tpl = Template::new(b"{SERIA}{NUMBER}".to_vec());
        let (org, detail) = (acme(), jane());
        let mut buf = b"leftover from a previous document".to_vec();
        let subs = Substitutions::new(&org, &detail, date(2026, 1, 1));
        tpl.render_into(&subs, &mut buf);
        assert_eq!(buf, b"A001");
    }
}
