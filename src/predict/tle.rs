use sgp4::Elements;

use crate::predict::error::TleError;

const LINE_LENGTH: usize = 69;
const MAX_NAME_LENGTH: usize = 24;

/// A two-line element set, optionally preceded by a name line.
///
/// Column positions are load-bearing: both lines must be exactly 69 columns, carry their
/// line number in column 1 and a valid modulo-10 checksum in column 69.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Tle {
    pub name: Option<String>,
    pub line1: String,
    pub line2: String,
}

impl Tle {
    pub fn parse(text: &str) -> Result<Self, TleError> {
        let lines: Vec<&str> = text
            .lines()
            .map(|l| l.trim())
            .filter(|l| !l.is_empty())
            .collect();

        let (name, line1, line2) = match lines.len() {
            2 => (None, lines[0], lines[1]),
            3 => (Some(lines[0]), lines[1], lines[2]),
            n => return Err(TleError::LineCount(n)),
        };

        if let Some(name) = name {
            if name.chars().count() > MAX_NAME_LENGTH {
                return Err(TleError::NameTooLong(name.to_string()));
            }
        }
        check_line(line1, 1)?;
        check_line(line2, 2)?;

        let catalog1 = &line1[2..7];
        let catalog2 = &line2[2..7];
        if catalog1 != catalog2 {
            return Err(TleError::CatalogMismatch(
                catalog1.to_string(),
                catalog2.to_string(),
            ));
        }

        Ok(Self {
            name: name.map(String::from),
            line1: line1.to_string(),
            line2: line2.to_string(),
        })
    }

    /// Decodes the element set with SGP4's own field parser.
    pub fn elements(&self) -> Result<Elements, TleError> {
        let elements = Elements::from_tle(
            self.name.clone(),
            self.line1.as_bytes(),
            self.line2.as_bytes(),
        )?;
        Ok(elements)
    }
}

fn check_line(line: &str, number: u8) -> Result<(), TleError> {
    if !line.is_ascii() || line.len() != LINE_LENGTH {
        return Err(TleError::LineLength {
            line: number,
            found: line.chars().count(),
        });
    }

    let bytes = line.as_bytes();
    if bytes[0] != b'0' + number || bytes[1] != b' ' {
        return Err(TleError::LineNumber { line: number });
    }

    let expected = match (bytes[LINE_LENGTH - 1] as char).to_digit(10) {
        Some(d) => d,
        None => {
            return Err(TleError::Checksum {
                line: number,
                expected: 10,
                computed: checksum(&line[..LINE_LENGTH - 1]),
            })
        }
    };
    let computed = checksum(&line[..LINE_LENGTH - 1]);
    if expected != computed {
        return Err(TleError::Checksum {
            line: number,
            expected,
            computed,
        });
    }

    Ok(())
}

/// Sum of all digits plus one per minus sign, modulo 10.
fn checksum(columns: &str) -> u32 {
    columns
        .chars()
        .map(|c| match c {
            '-' => 1,
            c => c.to_digit(10).unwrap_or(0),
        })
        .sum::<u32>()
        % 10
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;

    pub const SO50_NAME: &str = "Saudi-OSCAR 50";
    pub const SO50_LINE1: &str =
        "1 27607U 02058C   16262.37868737  .00000081  00000-0  32481-4 0  9994";
    pub const SO50_LINE2: &str =
        "2 27607  64.5541 236.1075 0057639 195.9937 163.9347 14.75209607739010";

    pub fn so50() -> Tle {
        Tle::parse(&format!("{SO50_NAME}\n{SO50_LINE1}\n{SO50_LINE2}\n")).unwrap()
    }

    #[test]
    fn parses_named_element_set() {
        let tle = so50();
        assert_eq!(tle.name.as_deref(), Some(SO50_NAME));
        assert_eq!(tle.line1, SO50_LINE1);
        assert_eq!(tle.line2, SO50_LINE2);
    }

    #[test]
    fn parses_padded_name_and_indentation() {
        let text = format!("  Saudi-OSCAR 50          \n  {SO50_LINE1}\n  {SO50_LINE2}  \n\n");
        let tle = Tle::parse(&text).unwrap();
        assert_eq!(tle.name.as_deref(), Some(SO50_NAME));
    }

    #[test]
    fn parses_unnamed_element_set() {
        let tle = Tle::parse(&format!("{SO50_LINE1}\n{SO50_LINE2}")).unwrap();
        assert!(tle.name.is_none());
    }

    #[test]
    fn decodes_elements() {
        let elements = so50().elements().unwrap();
        assert_eq!(elements.norad_id, 27607);
        assert!((elements.inclination - 64.5541).abs() < 1e-9);
        assert!((elements.mean_motion - 14.75209607).abs() < 1e-6);
    }

    #[test]
    fn rejects_wrong_line_count() {
        assert!(matches!(
            Tle::parse(SO50_LINE1),
            Err(TleError::LineCount(1))
        ));
    }

    #[test]
    fn rejects_truncated_line() {
        let err = Tle::parse(&format!("{}\n{SO50_LINE2}", &SO50_LINE1[..68])).unwrap_err();
        assert!(matches!(err, TleError::LineLength { line: 1, found: 68 }));
    }

    #[test]
    fn rejects_swapped_lines() {
        let err = Tle::parse(&format!("{SO50_LINE2}\n{SO50_LINE1}")).unwrap_err();
        assert!(matches!(err, TleError::LineNumber { line: 1 }));
    }

    #[test]
    fn rejects_bad_checksum() {
        let corrupted = SO50_LINE2.replace("64.5541", "64.5542");
        let err = Tle::parse(&format!("{SO50_LINE1}\n{corrupted}")).unwrap_err();
        assert!(matches!(
            err,
            TleError::Checksum {
                line: 2,
                expected: 0,
                computed: 1
            }
        ));
    }

    #[test]
    fn rejects_mismatched_catalog_numbers() {
        let iss_line2 = "2 25544  51.6276 176.0525 0011067 106.0444 249.6038 15.69246258311835";
        let err = Tle::parse(&format!("{SO50_LINE1}\n{iss_line2}")).unwrap_err();
        assert!(matches!(err, TleError::CatalogMismatch(_, _)));
    }

    #[test]
    fn rejects_long_name() {
        let text = format!("A VERY LONG SATELLITE NAME X\n{SO50_LINE1}\n{SO50_LINE2}");
        assert!(matches!(
            Tle::parse(&text),
            Err(TleError::NameTooLong(_))
        ));
    }

    #[test]
    fn checksum_counts_minus_signs() {
        assert_eq!(checksum("1 -- 9"), 2);
    }
}
