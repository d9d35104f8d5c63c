/// Trims a header and replaces each remaining space with an underscore.
pub fn normalize_header(value: &str) -> String {
    value
        .trim_matches(|c: char| c.is_whitespace() || c == '\u{feff}')
        .replace(' ', "_")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn trims_and_underscores_headers() {
        assert_eq!(normalize_header(" Lead Id "), "Lead_Id");
        assert_eq!(normalize_header("Number of Page Visited"), "Number_of_Page_Visited");
        assert_eq!(normalize_header("\tWhatsappInbound\n"), "WhatsappInbound");
    }

    #[test]
    fn preserves_case_and_repeated_spaces() {
        assert_eq!(normalize_header("current  stage"), "current__stage");
        assert_eq!(normalize_header("LeadId"), "LeadId");
    }

    #[test]
    fn strips_byte_order_mark() {
        assert_eq!(normalize_header("\u{feff}LeadId"), "LeadId");
    }
}
