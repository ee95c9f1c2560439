use foundation::time::Time;
use serde::Serialize;

/// Per-frame metadata handed to a render step.
///
/// `time` is the host's monotonic timestamp for the frame, not time since the
/// loop started, so two loops sampled at the same instant agree.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct Frame {
    /// 0-based frame index.
    pub index: u64,
    /// Seconds since the previous frame; zero for the first one.
    pub dt_s: f64,
    pub time: Time,
}

impl Frame {
    pub fn first(time: Time) -> Self {
        Self {
            index: 0,
            dt_s: 0.0,
            time,
        }
    }

    pub fn next(self, time: Time) -> Self {
        Self {
            index: self.index + 1,
            dt_s: time.since(self.time),
            time,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn first_frame_has_no_delta() {
        let f = Frame::first(Time(3.0));
        assert_eq!(f.index, 0);
        assert_eq!(f.dt_s, 0.0);
        assert_eq!(f.time, Time(3.0));
    }

    #[test]
    fn next_advances_index_and_time() {
        let f0 = Frame::first(Time(1.0));
        let f1 = f0.next(Time(1.5));
        assert_eq!(f1.index, 1);
        assert_eq!(f1.dt_s, 0.5);
        assert_eq!(f1.time, Time(1.5));
    }

    #[test]
    fn clock_going_backwards_clamps_delta() {
        let f1 = Frame::first(Time(2.0)).next(Time(1.0));
        assert_eq!(f1.dt_s, 0.0);
    }
}
