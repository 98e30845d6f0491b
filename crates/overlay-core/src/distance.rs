use crate::view::LatLng;
use geo::{Distance, Haversine};

pub const DISTANCE_PLACEHOLDER: &str = "Distance: -";

/// Great-circle distance in kilometers.
pub fn great_circle_km(from: LatLng, to: LatLng) -> f64 {
    Haversine.distance(from.to_point(), to.to_point()) / 1000.0
}

pub fn format_distance(km: f64) -> String {
    format!("Distance: {km:.2} km")
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Cursor {
    #[default]
    Default,
    Crosshair,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum MeasurePhase {
    #[default]
    Idle,
    OneSelected(LatLng),
    Done {
        from: LatLng,
        to: LatLng,
        km: f64,
    },
}

/// What a map click did to the measurement session.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MeasureStep {
    /// The tool is not armed.
    Ignored,
    /// First point recorded.
    Started(LatLng),
    /// A finished session was cleared and a new one started at this point.
    Restarted(LatLng),
    /// Second point recorded; the session is done.
    Finished { from: LatLng, to: LatLng, km: f64 },
}

/// Two-click measurement session.
///
/// Clicks only count while the tool is armed. Arming happens on activation;
/// finishing a measurement disarms it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DistanceTool {
    phase: MeasurePhase,
    armed: bool,
}

impl DistanceTool {
    pub const fn phase(&self) -> MeasurePhase {
        self.phase
    }

    pub const fn is_armed(&self) -> bool {
        self.armed
    }

    pub const fn cursor(&self) -> Cursor {
        if self.armed {
            Cursor::Crosshair
        } else {
            Cursor::Default
        }
    }

    pub fn activate(&mut self) {
        self.armed = true;
    }

    pub fn click(&mut self, at: LatLng) -> MeasureStep {
        if !self.armed {
            return MeasureStep::Ignored;
        }

        match self.phase {
            MeasurePhase::Idle => {
                self.phase = MeasurePhase::OneSelected(at);
                MeasureStep::Started(at)
            }
            MeasurePhase::OneSelected(from) => {
                let km = great_circle_km(from, at);
                self.phase = MeasurePhase::Done { from, to: at, km };
                self.armed = false;
                MeasureStep::Finished { from, to: at, km }
            }
            MeasurePhase::Done { .. } => {
                self.phase = MeasurePhase::OneSelected(at);
                MeasureStep::Restarted(at)
            }
        }
    }

    pub fn reset(&mut self) {
        self.phase = MeasurePhase::Idle;
        self.armed = false;
    }

    pub fn points(&self) -> Vec<LatLng> {
        match self.phase {
            MeasurePhase::Idle => Vec::new(),
            MeasurePhase::OneSelected(at) => vec![at],
            MeasurePhase::Done { from, to, .. } => vec![from, to],
        }
    }

    pub fn readout(&self) -> String {
        match self.phase {
            MeasurePhase::Done { km, .. } => format_distance(km),
            MeasurePhase::Idle | MeasurePhase::OneSelected(_) => DISTANCE_PLACEHOLDER.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const A: LatLng = LatLng::new(7.80, 80.70);
    const B: LatLng = LatLng::new(7.90, 80.80);

    #[test]
    fn reference_pair_measures_fifteen_point_six_five_km() {
        let km = great_circle_km(A, B);
        assert!((km - 15.6518).abs() < 1e-3, "got {km}");
        assert_eq!(format_distance(km), "Distance: 15.65 km");
    }

    #[test]
    fn clicks_are_ignored_until_activated() {
        let mut tool = DistanceTool::default();
        assert_eq!(tool.click(A), MeasureStep::Ignored);
        assert_eq!(tool.phase(), MeasurePhase::Idle);
        assert_eq!(tool.cursor(), Cursor::Default);
    }

    #[test]
    fn two_clicks_finish_and_disarm() {
        let mut tool = DistanceTool::default();
        tool.activate();
        assert_eq!(tool.cursor(), Cursor::Crosshair);

        assert_eq!(tool.click(A), MeasureStep::Started(A));
        assert!(tool.is_armed());
        assert_eq!(tool.readout(), DISTANCE_PLACEHOLDER);

        let MeasureStep::Finished { from, to, km } = tool.click(B) else {
            panic!("second click should finish the measurement");
        };
        assert_eq!((from, to), (A, B));
        assert!((km - great_circle_km(A, B)).abs() < f64::EPSILON);
        assert_eq!(tool.cursor(), Cursor::Default);
        assert_eq!(tool.readout(), "Distance: 15.65 km");
        assert_eq!(tool.points(), vec![A, B]);

        assert_eq!(tool.click(A), MeasureStep::Ignored);
    }

    #[test]
    fn activation_after_done_restarts_with_one_point() {
        let mut tool = DistanceTool::default();
        tool.activate();
        tool.click(A);
        tool.click(B);

        tool.activate();
        let third = LatLng::new(8.0, 81.0);
        assert_eq!(tool.click(third), MeasureStep::Restarted(third));
        assert_eq!(tool.points(), vec![third]);
        assert_eq!(tool.readout(), DISTANCE_PLACEHOLDER);
        assert!(tool.is_armed());
    }

    #[test]
    fn reactivating_mid_session_keeps_first_point() {
        let mut tool = DistanceTool::default();
        tool.activate();
        tool.click(A);
        tool.activate();
        assert_eq!(tool.points(), vec![A]);
        assert!(matches!(tool.click(B), MeasureStep::Finished { .. }));
    }

    #[test]
    fn reset_clears_points_and_disarms() {
        let mut tool = DistanceTool::default();
        tool.activate();
        tool.click(A);
        tool.reset();
        assert!(tool.points().is_empty());
        assert!(!tool.is_armed());
        assert_eq!(tool.cursor(), Cursor::Default);
    }
}
