/// Free-roam integration step.
pub mod roam;
