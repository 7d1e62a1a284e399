//! Offset translation laws over generated documents

use chordsheet_editor_wasm::models::document::StructuralDocument;
use chordsheet_editor_wasm::models::marker::ChordMarker;
use chordsheet_editor_wasm::renderers::DisplayOptions;
use chordsheet_editor_wasm::text::edit::{delete_atomic_at, insert_chord, DeleteDirection};
use proptest::prelude::*;

/// Lines of lyrics with chord markers and the occasional block line
fn song() -> impl Strategy<Value = String> {
    let segment = prop_oneof![
        3 => "[a-z ,]{1,8}",
        1 => prop::sample::select(vec!["[C]", "[Am:2]", "[G7::id1]", "[F#m]"]).prop_map(String::from),
    ];
    let line = prop_oneof![
        5 => prop::collection::vec(segment, 0..5).prop_map(|parts| parts.concat()),
        1 => "[a-zA-Z ]{0,10}".prop_map(|text| format!("{{heading:{}}}", text)),
    ];
    prop::collection::vec(line, 1..5).prop_map(|lines| lines.join("\n"))
}

proptest! {
    #[test]
    fn prop_offset_locator_round_trip(text in song()) {
        let doc = StructuralDocument::from_text(&text, &DisplayOptions::default());
        prop_assert_eq!(doc.total_len(), text.chars().count());

        for offset in 0..=doc.total_len() {
            let locator = doc.offset_to_locator(offset);
            let back = doc.locator_to_offset(locator);
            if doc.is_inside_atomic(offset) {
                prop_assert!(back > offset, "snapped forward out of the widget");
                prop_assert!(!doc.is_inside_atomic(back));
            } else {
                prop_assert_eq!(back, offset);
            }
        }
    }

    #[test]
    fn prop_out_of_range_clamps(text in song(), extra in 1usize..100) {
        let doc = StructuralDocument::from_text(&text, &DisplayOptions::default());
        let end = doc.total_len();
        prop_assert_eq!(doc.snap_offset(end + extra), end);
    }

    #[test]
    fn prop_insert_keeps_serialization_law(text in song(), at in any::<prop::sample::Index>()) {
        let options = DisplayOptions::default();
        let mut doc = StructuralDocument::from_text(&text, &options);
        let offset = at.index(doc.total_len() + 1);

        let outcome = insert_chord(&mut doc, offset, ChordMarker::new("D"), &options);
        let flat = doc.to_text();
        prop_assert_eq!(doc.total_len(), flat.chars().count());
        prop_assert!(!doc.is_inside_atomic(outcome.caret));

        // The caret sits right after "[D]"
        let before: String = flat.chars().take(outcome.caret).collect();
        prop_assert!(before.trim_end().ends_with("[D]"));

        // Rebuilding from the flat text gives the same model
        let rebuilt = StructuralDocument::from_text(&flat, &options);
        prop_assert_eq!(&rebuilt, &doc);

        // Deleting the widget leaves only the spacing that was added
        let caret_after_chord = before.trim_end().chars().count();
        let removed = delete_atomic_at(&mut doc, caret_after_chord, DeleteDirection::Backward);
        prop_assert!(removed.is_some());
        prop_assert!(!doc.to_text().contains("[D]") || text.contains("[D]"));
    }
}
