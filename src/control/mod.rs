// Purpose - turn raw knob and encoder input into parameter changes

pub mod knob;
pub mod surface;

pub use knob::{Knob, CATCH_THRESHOLD};
pub use surface::{
    CatchPolicy, ControlSurface, ControlUpdate, KnobBank, KnobView, Mode, ModeKnobs, Param,
    ParamChange, SurfaceSnapshot,
};
