pub mod shared {
    pub mod constants;
    pub mod point;
}

pub mod engagement {
    pub mod domain {
        pub mod alert_scheduler;
        pub mod engagement_config;
        pub mod engagement_evaluator;
        pub mod focus_zone;
        pub mod gaze_sample;
    }
    pub mod infrastructure;
}

pub mod orientation {
    pub mod domain {
        pub mod face_orientation;
    }
}

pub mod gaze {
    pub mod domain {
        pub mod face_annotations;
        pub mod iris_gaze_classifier;
    }
}

pub mod recognition {
    pub mod domain {
        pub mod face_matcher;
    }
}

pub mod monitor {
    pub mod engagement_monitor;
    pub mod gaze_source;
    pub mod infrastructure;
    pub mod trace_replay;
}
