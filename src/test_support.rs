//! Builds small single-page PDFs for tests.
//!
//! The page uses the standard Helvetica font with a `ToUnicode` map that sends
//! the high WinAnsi codes to Arabic letters, so extracted text comes back as
//! Arabic without embedding a font program.

const ARABIC_LETTERS: &[char] = &[
    'ا', 'ب', 'ت', 'ث', 'ج', 'ح', 'خ', 'د', 'ذ', 'ر', 'ز', 'س', 'ش', 'ص', 'ض', 'ط', 'ظ', 'ع',
    'غ', 'ف', 'ق', 'ك', 'ل', 'م', 'ن', 'ه', 'و', 'ي', 'ى', 'ة', 'أ', 'إ', 'آ', 'ؤ', 'ئ',
];
const FIRST_ARABIC_CODE: u8 = 0xC0;

fn encode_line(line: &str) -> String {
    line.chars()
        .map(|c| {
            let code = if c.is_ascii() {
                c as u8
            } else {
                let index = ARABIC_LETTERS
                    .iter()
                    .position(|&letter| letter == c)
                    .unwrap_or_else(|| panic!("no glyph code for {c:?}"));
                FIRST_ARABIC_CODE + index as u8
            };
            format!("{code:02X}")
        })
        .collect()
}

fn to_unicode_cmap() -> String {
    let mut cmap = String::from(
        "/CIDInit /ProcSet findresource begin\n12 dict begin\nbegincmap\n\
         /CMapName /Roster-UCS def\n/CMapType 2 def\n\
         1 begincodespacerange\n<00> <FF>\nendcodespacerange\n",
    );
    cmap.push_str(&format!("{} beginbfchar\n", ARABIC_LETTERS.len()));
    for (index, letter) in ARABIC_LETTERS.iter().enumerate() {
        cmap.push_str(&format!(
            "<{:02X}> <{:04X}>\n",
            FIRST_ARABIC_CODE as usize + index,
            *letter as u32
        ));
    }
    cmap.push_str("endbfchar\nendcmap\nCMapName currentdict /CMap defineresource pop\nend\nend\n");
    cmap
}

fn stream(body: &str) -> String {
    format!("<< /Length {} >>\nstream\n{}\nendstream", body.len(), body)
}

/// Returns a PDF whose page shows `lines` top to bottom, one text line each.
pub fn roster_pdf(lines: &[&str]) -> Vec<u8> {
    let mut content = String::from("BT\n/F1 12 Tf\n72 720 Td\n");
    for (i, line) in lines.iter().enumerate() {
        if i > 0 {
            content.push_str("0 -20 Td\n");
        }
        content.push_str(&format!("<{}> Tj\n", encode_line(line)));
    }
    content.push_str("ET");

    let objects = [
        "<< /Type /Catalog /Pages 2 0 R >>".to_string(),
        "<< /Type /Pages /Kids [3 0 R] /Count 1 >>".to_string(),
        "<< /Type /Page /Parent 2 0 R /MediaBox [0 0 612 792] \
         /Resources << /Font << /F1 5 0 R >> >> /Contents 4 0 R >>"
            .to_string(),
        stream(&content),
        "<< /Type /Font /Subtype /Type1 /BaseFont /Helvetica \
         /Encoding /WinAnsiEncoding /ToUnicode 6 0 R >>"
            .to_string(),
        stream(&to_unicode_cmap()),
    ];

    let mut pdf = String::from("%PDF-1.4\n");
    let mut offsets = Vec::with_capacity(objects.len());
    for (i, object) in objects.iter().enumerate() {
        offsets.push(pdf.len());
        pdf.push_str(&format!("{} 0 obj\n{}\nendobj\n", i + 1, object));
    }

    let xref_offset = pdf.len();
    pdf.push_str(&format!("xref\n0 {}\n0000000000 65535 f \n", objects.len() + 1));
    for offset in offsets {
        pdf.push_str(&format!("{offset:010} 00000 n \n"));
    }
    pdf.push_str(&format!(
        "trailer\n<< /Size {} /Root 1 0 R >>\nstartxref\n{}\n%%EOF\n",
        objects.len() + 1,
        xref_offset
    ));
    pdf.into_bytes()
}
