use crossview::core::measure::*;
use proptest::prelude::*;

#[test]
fn test_spec_packing() {
    let spec = MeasureSpec::make(100, MeasureMode::Exactly);
    assert_eq!(spec.size(), 100);
    assert_eq!(spec.mode(), MeasureMode::Exactly);
    assert_eq!(MeasureSpec::from_bits(spec.to_bits()), spec);

    let unbounded = MeasureSpec::unspecified();
    assert_eq!(unbounded.size(), 0);
    assert_eq!(unbounded.mode(), MeasureMode::Unspecified);
}

#[test]
fn test_spec_display() {
    assert_eq!(
        MeasureSpec::make(100, MeasureMode::Exactly).to_string(),
        "MeasureSpec: EXACTLY 100"
    );
    assert_eq!(
        MeasureSpec::make(50, MeasureMode::AtMost).to_string(),
        "MeasureSpec: AT_MOST 50"
    );
    assert_eq!(MeasureSpec::unspecified().to_string(), "MeasureSpec: UNSPECIFIED 0");
}

proptest! {
    #[test]
    fn spec_round_trips_for_any_size(size in 0..=MAX_SPEC_SIZE, mode_bits in 0u32..3) {
        let mode = match mode_bits {
            0 => MeasureMode::Unspecified,
            1 => MeasureMode::Exactly,
            _ => MeasureMode::AtMost,
        };
        let spec = MeasureSpec::make(size, mode);
        prop_assert_eq!(spec.size(), size);
        prop_assert_eq!(spec.mode(), mode);
        prop_assert_eq!(MeasureSpec::from_bits(spec.to_bits()), spec);
    }
}

#[test]
fn test_child_spec_explicit_size_wins() {
    // A declared size is exact, but never exceeds a real parent bound.
    let spec = child_measure_spec(200, MeasureMode::Exactly, 0, 100, false);
    assert_eq!((spec.size(), spec.mode()), (100, MeasureMode::Exactly));

    let clipped = child_measure_spec(200, MeasureMode::Exactly, 0, 300, false);
    assert_eq!((clipped.size(), clipped.mode()), (200, MeasureMode::Exactly));

    let unbounded = child_measure_spec(0, MeasureMode::Unspecified, 0, 100, false);
    assert_eq!((unbounded.size(), unbounded.mode()), (100, MeasureMode::Exactly));
}

#[test]
fn test_child_spec_without_declared_size() {
    let stretched = child_measure_spec(200, MeasureMode::Exactly, 20, -1, true);
    assert_eq!((stretched.size(), stretched.mode()), (180, MeasureMode::Exactly));

    let hugging = child_measure_spec(200, MeasureMode::Exactly, 20, -1, false);
    assert_eq!((hugging.size(), hugging.mode()), (180, MeasureMode::AtMost));

    let at_most = child_measure_spec(200, MeasureMode::AtMost, 20, -1, true);
    assert_eq!((at_most.size(), at_most.mode()), (180, MeasureMode::AtMost));

    let unspecified = child_measure_spec(0, MeasureMode::Unspecified, 20, -1, true);
    assert_eq!((unspecified.size(), unspecified.mode()), (0, MeasureMode::Unspecified));
}

#[test]
fn test_child_spec_margins_never_go_negative() {
    let spec = child_measure_spec(10, MeasureMode::Exactly, 50, -1, true);
    assert_eq!(spec.size(), 0);
}

#[test]
fn test_resolve_exactly_overrides_desired() {
    let packed = resolve_size_and_state(42.0, 100.0, MeasureMode::Exactly, 0);
    assert_eq!(packed & MEASURED_SIZE_MASK, 100);
    assert_eq!(packed & MEASURED_STATE_MASK, 0);
}

#[test]
fn test_resolve_at_most_flags_too_small() {
    let packed = resolve_size_and_state(150.0, 100.0, MeasureMode::AtMost, 0);
    assert_eq!(packed & MEASURED_SIZE_MASK, 100);
    assert_eq!(packed & MEASURED_STATE_TOO_SMALL, MEASURED_STATE_TOO_SMALL);

    let fits = resolve_size_and_state(80.0, 100.0, MeasureMode::AtMost, 0);
    assert_eq!(fits & MEASURED_SIZE_MASK, 80);
    assert_eq!(fits & MEASURED_STATE_MASK, 0);
}

#[test]
fn test_resolve_unspecified_keeps_desired() {
    let packed = resolve_size_and_state(33.3, 0.0, MeasureMode::Unspecified, 0);
    assert_eq!(packed & MEASURED_SIZE_MASK, 34);
}

#[test]
fn test_resolve_propagates_child_state() {
    let packed =
        resolve_size_and_state(80.0, 100.0, MeasureMode::AtMost, MEASURED_STATE_TOO_SMALL);
    assert_eq!(packed & MEASURED_STATE_TOO_SMALL, MEASURED_STATE_TOO_SMALL);
}

#[test]
fn test_combine_measured_states() {
    assert_eq!(combine_measured_states(0, MEASURED_STATE_TOO_SMALL), MEASURED_STATE_TOO_SMALL);
    assert_eq!(combine_measured_states(0, 0), 0);
}
