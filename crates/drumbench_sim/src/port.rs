//! Port specifications, the port value table, and the [`Device`] trait.

use crate::error::SimError;
use drumbench_common::{mask, to_binary_string};

/// Index of a port within its device's [`PortMap`].
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug)]
pub struct PortId(u32);

impl PortId {
    /// Creates a port ID from a raw index.
    pub const fn from_raw(index: u32) -> Self {
        Self(index)
    }

    /// Returns the raw index.
    pub const fn as_raw(self) -> u32 {
        self.0
    }
}

/// Whether a port is driven by the harness or by the device.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Direction {
    /// Written by the harness.
    Input,
    /// Written by the device during `eval`.
    Output,
}

/// The radix used when a port value appears in a diagnostic.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Radix {
    /// `0x80`
    Hex,
    /// `4'b0101`
    Binary,
    /// `128`
    Decimal,
}

/// Static description of one device port.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct PortSpec {
    /// Signal name.
    pub name: &'static str,
    /// Who drives the port.
    pub direction: Direction,
    /// Width in bits, at most 64.
    pub width: u32,
    /// Display radix for diagnostics.
    pub radix: Radix,
}

impl PortSpec {
    /// An input port displayed in decimal.
    pub const fn input(name: &'static str, width: u32) -> Self {
        Self {
            name,
            direction: Direction::Input,
            width,
            radix: Radix::Decimal,
        }
    }

    /// An output port displayed in decimal.
    pub const fn output(name: &'static str, width: u32) -> Self {
        Self {
            name,
            direction: Direction::Output,
            width,
            radix: Radix::Decimal,
        }
    }

    /// Returns this spec with a different display radix.
    pub const fn with_radix(mut self, radix: Radix) -> Self {
        self.radix = radix;
        self
    }

    /// Renders `value` in this port's radix and width.
    pub fn format(&self, value: u64) -> String {
        match self.radix {
            Radix::Hex => {
                let digits = self.width.div_ceil(4).max(1) as usize;
                format!("0x{value:0digits$x}")
            }
            Radix::Binary => format!(
                "{}'b{}",
                self.width,
                to_binary_string(value, self.width as usize)
            ),
            Radix::Decimal => value.to_string(),
        }
    }
}

/// The current value of every port of one device.
///
/// Inputs are written by the harness through [`drive`](PortMap::drive), which
/// enforces direction and width. Devices update their outputs with
/// [`write`](PortMap::write) during `eval`.
#[derive(Clone, Debug)]
pub struct PortMap {
    device: String,
    specs: Vec<PortSpec>,
    values: Vec<u64>,
}

impl PortMap {
    /// Creates a port table with every port at zero.
    pub fn new(device: impl Into<String>, specs: &[PortSpec]) -> Self {
        Self {
            device: device.into(),
            specs: specs.to_vec(),
            values: vec![0; specs.len()],
        }
    }

    /// Returns the owning device's name.
    pub fn device(&self) -> &str {
        &self.device
    }

    /// Returns all port specifications in declaration order.
    pub fn specs(&self) -> &[PortSpec] {
        &self.specs
    }

    /// Looks up a port by name.
    pub fn find(&self, name: &str) -> Option<(PortId, &PortSpec)> {
        self.specs
            .iter()
            .enumerate()
            .find(|(_, spec)| spec.name == name)
            .map(|(i, spec)| (PortId::from_raw(i as u32), spec))
    }

    /// Resolves a port name to its ID.
    pub fn id(&self, name: &str) -> Result<PortId, SimError> {
        self.find(name)
            .map(|(id, _)| id)
            .ok_or_else(|| self.unknown(name))
    }

    /// Returns the specification of a port by name.
    pub fn spec(&self, name: &str) -> Result<&PortSpec, SimError> {
        self.find(name)
            .map(|(_, spec)| spec)
            .ok_or_else(|| self.unknown(name))
    }

    /// Drives an input port from the harness side.
    pub fn drive(&mut self, name: &str, value: u64) -> Result<(), SimError> {
        let (id, spec) = self.find(name).ok_or_else(|| self.unknown(name))?;
        if spec.direction != Direction::Input {
            return Err(SimError::NotAnInput {
                device: self.device.clone(),
                port: name.to_string(),
            });
        }
        if value & !mask(spec.width) != 0 {
            return Err(SimError::ValueTooWide {
                port: name.to_string(),
                value,
                width: spec.width,
            });
        }
        self.values[id.as_raw() as usize] = value;
        Ok(())
    }

    /// Reads a port by name.
    pub fn value(&self, name: &str) -> Result<u64, SimError> {
        self.id(name).map(|id| self.read(id))
    }

    /// Reads a port by ID.
    pub fn read(&self, id: PortId) -> u64 {
        self.values[id.as_raw() as usize]
    }

    /// Writes a port by ID from the device side, truncating to the port width.
    pub fn write(&mut self, id: PortId, value: u64) {
        let index = id.as_raw() as usize;
        self.values[index] = value & mask(self.specs[index].width);
    }

    fn unknown(&self, name: &str) -> SimError {
        SimError::UnknownPort {
            device: self.device.clone(),
            port: name.to_string(),
        }
    }
}

/// A simulated device under test.
///
/// Implementors own a [`PortMap`] and resolve their logic in [`eval`](Device::eval).
/// After `eval` returns, every output reflects the current inputs and the most
/// recent clock edge. The harness never writes outputs.
pub trait Device {
    /// Returns the device's port table.
    fn ports(&self) -> &PortMap;

    /// Returns the device's port table mutably.
    fn ports_mut(&mut self) -> &mut PortMap;

    /// Resolves the device's logic for the current input values.
    fn eval(&mut self);

    /// Releases any resources held by the device at the end of a run.
    fn finalize(&mut self) {}

    /// Returns the device name.
    fn name(&self) -> &str {
        self.ports().device()
    }

    /// Drives an input port.
    fn set(&mut self, port: &str, value: u64) -> Result<(), SimError> {
        self.ports_mut().drive(port, value)
    }

    /// Reads a port.
    fn get(&self, port: &str) -> Result<u64, SimError> {
        self.ports().value(port)
    }
}

impl<D: Device + ?Sized> Device for Box<D> {
    fn ports(&self) -> &PortMap {
        (**self).ports()
    }

    fn ports_mut(&mut self) -> &mut PortMap {
        (**self).ports_mut()
    }

    fn eval(&mut self) {
        (**self).eval()
    }

    fn finalize(&mut self) {
        (**self).finalize()
    }
}
