use notchy::{clamp, format_elapsed, sanitize};

fn approx_eq(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-6
}

#[test]
fn clamp_keeps_inner_value() {
    assert_eq!(clamp(10.0, 0.0, 20.0), 10.0);
}

#[test]
fn clamp_limits_low_and_high() {
    assert_eq!(clamp(-1.0, 0.0, 1.0), 0.0);
    assert_eq!(clamp(2.0, 0.0, 1.0), 1.0);
}

#[test]
fn sanitize_passes_finite_values_through_clamp() {
    assert!(approx_eq(sanitize(1.5, 1.06, 1.0, 2.2), 1.5));
    assert!(approx_eq(sanitize(9.0, 1.06, 1.0, 2.2), 2.2));
}

#[test]
fn sanitize_replaces_non_finite_with_fallback() {
    assert!(approx_eq(sanitize(f64::NAN, 1.06, 1.0, 2.2), 1.06));
    assert!(approx_eq(sanitize(f64::INFINITY, 20.0, 4.0, 260.0), 20.0));
    assert!(approx_eq(sanitize(f64::NEG_INFINITY, 20.0, 4.0, 260.0), 20.0));
}

#[test]
fn sanitize_clamps_out_of_range_fallback() {
    assert!(approx_eq(sanitize(f64::NAN, 500.0, 4.0, 260.0), 260.0));
}

#[test]
fn format_elapsed_minutes_and_seconds() {
    assert_eq!(format_elapsed(0.0), "00:00");
    assert_eq!(format_elapsed(59.9), "00:59");
    assert_eq!(format_elapsed(125.0), "02:05");
}

#[test]
fn format_elapsed_shows_hours_past_one_hour() {
    assert_eq!(format_elapsed(3600.0), "01:00:00");
    assert_eq!(format_elapsed(3723.0), "01:02:03");
}

#[test]
fn format_elapsed_treats_garbage_as_zero() {
    assert_eq!(format_elapsed(-5.0), "00:00");
    assert_eq!(format_elapsed(f64::NAN), "00:00");
}
