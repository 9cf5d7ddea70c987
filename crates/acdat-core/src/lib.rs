pub mod calibration;
pub mod domain;
pub mod export;
pub mod numerics;
pub mod pipeline;
pub mod record;
pub mod threshold;
pub mod trim;
