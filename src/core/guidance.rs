/// Kindle formatting guidance: a pure function of the page count.

use crate::schema::brief::ManuscriptInputs;
use crate::schema::manuscript::Guidance;

/// Manuscripts up to this many pages get the short-read trim band.
pub const SHORT_READ_MAX_PAGES: u32 = 20;

pub const SHORT_TRIM: &str = "5 x 8 in";
pub const LONG_TRIM: &str = "5.5 x 8.5 in";

const SHORT_INTERIOR: &str = "Black & white on cream paper; reflowable Kindle eBook";
const LONG_INTERIOR: &str = "Black & white on white paper; reflowable Kindle eBook";
const FONT: &str = "Garamond 11 pt body, 1.2 line spacing; sans-serif headings at 16-18 pt";
const MARGINS: &str = "0.375 in inside (gutter), 0.25 in outside, 0.5 in top and bottom";

const FRONT_MATTER: &[&str] = &[
    "Title page",
    "Copyright page",
    "Dedication",
    "Table of contents",
];

const BACK_MATTER: &[&str] = &[
    "About the author",
    "Call to action: leave a review",
    "Related reads",
];

/// Formatting guidance for a brief. Reads nothing but `target_pages`, so it
/// can run alongside chapter and page synthesis.
pub fn generate_guidance(inputs: &ManuscriptInputs) -> Guidance {
    let short = inputs.target_pages <= SHORT_READ_MAX_PAGES;
    let (trim_size, interior) = if short {
        (SHORT_TRIM, SHORT_INTERIOR)
    } else {
        (LONG_TRIM, LONG_INTERIOR)
    };

    Guidance {
        trim_size: trim_size.to_string(),
        interior: interior.to_string(),
        font: FONT.to_string(),
        margins: MARGINS.to_string(),
        front_matter: FRONT_MATTER.iter().map(|s| s.to_string()).collect(),
        back_matter: BACK_MATTER.iter().map(|s| s.to_string()).collect(),
    }
}
