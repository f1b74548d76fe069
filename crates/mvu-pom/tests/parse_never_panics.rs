use mvu_pom::{PomEditor, parse_pom};
use proptest::prelude::*;

proptest! {
    #[test]
    fn parse_never_panics(input in ".{0,400}") {
        let _ = parse_pom(&input);
    }

    #[test]
    fn parse_never_panics_on_tag_soup(
        parts in prop::collection::vec(
            prop_oneof![
                Just("<project>".to_string()),
                Just("</project>".to_string()),
                Just("<dependencies>".to_string()),
                Just("</dependencies>".to_string()),
                Just("<dependency>".to_string()),
                Just("</dependency>".to_string()),
                Just("<version>".to_string()),
                Just("</version>".to_string()),
                Just("<version/>".to_string()),
                Just("<![CDATA[x]]>".to_string()),
                Just("&amp;".to_string()),
                "[ a-z0-9.\n]{0,6}",
            ],
            0..40,
        )
    ) {
        let input = parts.concat();
        if let Ok(doc) = parse_pom(&input) {
            // Whatever parses must also survive a dependency section rewrite.
            let mut editor = PomEditor::new(&doc);
            editor.replace_dependencies(&[]);
            let out = editor.finish();
            prop_assert!(out.is_some());
        }
    }
}
