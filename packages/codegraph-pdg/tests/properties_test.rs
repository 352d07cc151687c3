//! Property tests over generated straight-line procedures

mod common;

use codegraph_pdg::{EdgeKind, ElementId, FilePdg, OutputFormat, PdgExtractor};
use common::*;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig::with_cases(48))]

    #[test]
    fn prop_one_element_per_statement(count in 0usize..24) {
        let file = PdgExtractor::default().extract(&straight_line_unit(count)).unwrap();
        let pdg = procedure(&file, 0);

        prop_assert_eq!(pdg.element_count(), count + ElementId::FIRST_FRAGMENT.0 as usize);
        prop_assert_eq!(pdg.fragments().count(), count);
    }

    #[test]
    fn prop_straight_line_is_a_chain(count in 0usize..24) {
        let file = PdgExtractor::default().extract(&straight_line_unit(count)).unwrap();
        let pdg = procedure(&file, 0);

        prop_assert_eq!(entry_out_degree(pdg), 1);
        prop_assert_eq!(exit_in_degree(pdg), 1);
        prop_assert_eq!(pdg.stats().control_edges, count + 1);
        prop_assert_eq!(pdg.stats().exit_edges, 1);
        prop_assert!(pdg.unreachable_from_entry().is_empty());
    }

    #[test]
    fn prop_edges_stay_inside_the_procedure(count in 0usize..24) {
        let file = PdgExtractor::default().extract(&straight_line_unit(count)).unwrap();
        let pdg = procedure(&file, 0);

        for edge in pdg.edges() {
            prop_assert!(pdg.contains_element(edge.from.element));
            prop_assert!(pdg.contains_element(edge.to.element));
            prop_assert!(edge.kind != EdgeKind::Data || edge.from != edge.to);
        }
        prop_assert!(file.interprocedural_edges.is_empty());
    }

    #[test]
    fn prop_output_is_reproducible(count in 0usize..16) {
        let extractor = PdgExtractor::default();
        let unit = straight_line_unit(count);

        let dot = extractor.render(&unit, OutputFormat::Dot).unwrap();
        prop_assert_eq!(&dot, &extractor.render(&unit, OutputFormat::Dot).unwrap());

        let json = extractor.render(&unit, OutputFormat::Json).unwrap();
        let restored = FilePdg::from_json(&json).unwrap();
        prop_assert_eq!(restored.to_dot(), dot);
    }
}
