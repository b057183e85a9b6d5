//! Port descriptors for the node system.
//!
//! Each node kind declares its ports (inputs/outputs) via static
//! `PortDescriptor` arrays. The compiler uses them to classify sources and
//! sinks and to order the two sides of a join.

/// Handle name of a join's left input.
pub const LEFT_HANDLE: &str = "left";
/// Handle name of a join's right input.
pub const RIGHT_HANDLE: &str = "right";

/// Whether a port is an input or output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PortDirection {
    Input,
    Output,
}

/// Static descriptor for a node's port.
#[derive(Debug, Clone)]
pub struct PortDescriptor {
    pub name: &'static str,
    pub direction: PortDirection,
}

impl PortDescriptor {
    pub const fn input(name: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Input,
        }
    }

    pub const fn output(name: &'static str) -> Self {
        Self {
            name,
            direction: PortDirection::Output,
        }
    }

    pub fn is_input(&self) -> bool {
        self.direction == PortDirection::Input
    }

    pub fn is_output(&self) -> bool {
        self.direction == PortDirection::Output
    }
}

pub(crate) static EVENT_PORTS: &[PortDescriptor] = &[PortDescriptor::output("out")];

pub(crate) static UNION_ALL_PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("in"),
    PortDescriptor::output("out"),
];

pub(crate) static JOIN_PORTS: &[PortDescriptor] = &[
    PortDescriptor::input(LEFT_HANDLE),
    PortDescriptor::input(RIGHT_HANDLE),
    PortDescriptor::output("out"),
];

pub(crate) static TRANSFORM_PORTS: &[PortDescriptor] = &[
    PortDescriptor::input("in"),
    PortDescriptor::output("out"),
];

pub(crate) static OUTPUT_PORTS: &[PortDescriptor] = &[PortDescriptor::input("in")];
