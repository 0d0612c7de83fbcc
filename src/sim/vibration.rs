//! Vibration model
//!
//! Pure functions mapping (pattern, simulation time, modifiers) to an
//! instantaneous positional offset or scale pulse, plus the time-independent
//! worst-case envelope the collision radius is built from. The envelope is
//! what keeps static placement conservative: a spot that is tight against
//! worst-case excursion is refused even if it looks clear right now.

use glam::Vec2;

use super::catalog::VibrationPattern;

/// Diagonal patterns move along (1,1) scaled by 0.7, so the worst-case
/// magnitude is amplitude * 0.7 * sqrt(2).
const DIAGONAL_FACTOR: f32 = 0.7;

/// Pulse patterns breathe ±10% in scale with zero positional drift
const PULSE_SCALE: f32 = 0.1;

/// Instantaneous positional offset at the given simulation time.
///
/// `t = (sim_time + phase) * speed`; `amplitude` is already in canvas px.
pub fn offset(
    pattern: VibrationPattern,
    speed: f32,
    amplitude: f32,
    sim_time: f64,
    phase: f32,
) -> Vec2 {
    let t = ((sim_time as f32) + phase) * speed;
    match pattern {
        VibrationPattern::Horizontal => Vec2::new(t.sin() * amplitude, 0.0),
        VibrationPattern::Vertical => Vec2::new(0.0, t.sin() * amplitude),
        VibrationPattern::Circular => Vec2::new(t.cos() * amplitude, t.sin() * amplitude),
        VibrationPattern::Pulse => Vec2::ZERO,
        VibrationPattern::Diagonal => {
            let s = t.sin() * amplitude * DIAGONAL_FACTOR;
            Vec2::new(s, s)
        }
    }
}

/// Instantaneous scale multiplier (only Pulse deviates from 1.0)
pub fn scale_pulse(pattern: VibrationPattern, speed: f32, sim_time: f64, phase: f32) -> f32 {
    match pattern {
        VibrationPattern::Pulse => {
            let t = ((sim_time as f32) + phase) * speed;
            1.0 + t.sin() * PULSE_SCALE
        }
        _ => 1.0,
    }
}

/// Maximum excursion the pattern can ever produce, independent of phase.
///
/// For positional patterns this is a distance; for Pulse the envelope is the
/// extra radius the ±10% breathing can add to a body resting at `rest_radius`.
pub fn envelope(pattern: VibrationPattern, amplitude: f32, rest_radius: f32) -> f32 {
    match pattern {
        VibrationPattern::Horizontal | VibrationPattern::Vertical | VibrationPattern::Circular => {
            amplitude
        }
        VibrationPattern::Diagonal => amplitude * DIAGONAL_FACTOR * std::f32::consts::SQRT_2,
        VibrationPattern::Pulse => rest_radius * PULSE_SCALE,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-5;

    #[test]
    fn horizontal_stays_on_x_axis() {
        for i in 0..32 {
            let t = i as f64 * 0.13;
            let o = offset(VibrationPattern::Horizontal, 3.0, 4.0, t, 0.7);
            assert_eq!(o.y, 0.0);
            assert!(o.x.abs() <= 4.0 + EPS);
        }
    }

    #[test]
    fn vertical_stays_on_y_axis() {
        let o = offset(VibrationPattern::Vertical, 2.0, 5.0, 0.4, 0.0);
        assert_eq!(o.x, 0.0);
        assert!(o.y.abs() <= 5.0 + EPS);
    }

    #[test]
    fn circular_has_constant_magnitude() {
        for i in 0..16 {
            let t = i as f64 * 0.31;
            let o = offset(VibrationPattern::Circular, 2.2, 6.0, t, 1.3);
            assert!((o.length() - 6.0).abs() < 1e-4);
        }
    }

    #[test]
    fn pulse_never_drifts() {
        let o = offset(VibrationPattern::Pulse, 2.0, 8.0, 1.9, 0.2);
        assert_eq!(o, Vec2::ZERO);
        // ...but breathes in scale
        let s = scale_pulse(VibrationPattern::Pulse, 2.0, 1.9, 0.2);
        assert!((0.9..=1.1).contains(&s));
        assert!((scale_pulse(VibrationPattern::Circular, 2.0, 1.9, 0.2) - 1.0).abs() < EPS);
    }

    #[test]
    fn diagonal_envelope_is_worst_case_magnitude() {
        let amp = 5.0;
        let env = envelope(VibrationPattern::Diagonal, amp, 30.0);
        assert!((env - amp * 0.7 * std::f32::consts::SQRT_2).abs() < EPS);
        // Every sampled offset stays inside the envelope
        for i in 0..64 {
            let o = offset(VibrationPattern::Diagonal, 3.5, amp, i as f64 * 0.07, 0.0);
            assert!(o.length() <= env + EPS);
        }
    }

    #[test]
    fn pulse_envelope_scales_with_rest_radius() {
        let env = envelope(VibrationPattern::Pulse, 0.0, 45.0);
        assert!((env - 4.5).abs() < EPS);
    }

    #[test]
    fn positional_envelopes_equal_amplitude() {
        for p in [
            VibrationPattern::Horizontal,
            VibrationPattern::Vertical,
            VibrationPattern::Circular,
        ] {
            assert!((envelope(p, 7.0, 30.0) - 7.0).abs() < EPS);
        }
    }
}
