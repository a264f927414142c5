//! Multi-valued filtering across categorical fields

use crate::model::{FilterSelection, RecordView, VehicleRecord};

/// Records matching every active field of `selection`.
///
/// AND across fields, OR within one field's accepted values. The input is
/// never touched; the result refers to it by index.
pub fn apply<'a>(records: &'a [VehicleRecord], selection: &FilterSelection) -> RecordView<'a> {
    let view = RecordView::all(records);
    if selection.is_unrestricted() {
        return view;
    }
    view.retain(|record| selection.matches(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::FilterField;
    use crate::service::test_support::{record, ten_makes};

    #[test]
    fn test_or_within_field() {
        let records = ten_makes();
        let selection = FilterSelection::new()
            .with(FilterField::Make, ["Toyota", "Honda"])
            .with(FilterField::City, Vec::<String>::new());

        let view = apply(&records, &selection);
        assert_eq!(view.len(), 8);
        assert!(view.records().all(|r| r.make != "Ford"));
    }

    #[test]
    fn test_and_across_fields() {
        let records = ten_makes();
        let selection = FilterSelection::new()
            .with(FilterField::Make, ["Toyota", "Ford"])
            .with(FilterField::FuelSource, ["Electric"]);

        let view = apply(&records, &selection);
        assert_eq!(view.len(), 2);
        assert!(view.records().all(|r| r.make == "Ford"));
    }

    #[test]
    fn test_unrestricted_selection_is_noop() {
        let records = ten_makes();
        let view = apply(&records, &FilterSelection::new());
        assert_eq!(view.len(), records.len());
        assert_eq!(view.indices(), (0..records.len()).collect::<Vec<_>>().as_slice());
    }

    #[test]
    fn test_no_match_yields_empty_view() {
        let records = ten_makes();
        let selection = FilterSelection::new().with(FilterField::City, ["Denver"]);
        assert!(apply(&records, &selection).is_empty());
    }

    #[test]
    fn test_preserves_input_order() {
        let records = vec![
            record("Honda", "Gasoline", 2010),
            record("Toyota", "Hybrid", 2011),
            record("Honda", "Hybrid", 2012),
        ];
        let selection = FilterSelection::new().with(FilterField::Make, ["Honda"]);
        assert_eq!(apply(&records, &selection).indices(), &[0, 2]);
    }
}
