//! # Boot Sequence
//!
//! The second-stage entry runs this exactly once:
//!
//! ```text
//!   registers ──► plan ──┬── Err ──► on_failure (halt)
//!                        │
//!                        └── Ok ───► clear .bss ──► copy vectors ──► on_success (next stage)
//! ```
//!
//! Every decision is made in [`BootSequence::plan`], before a single byte of
//! memory is written. Only after the plan stands does [`BootSequence::run`]
//! clear `.bss`, relocate the vector table, and hand the validated registers
//! onwards. The handoff stays in locals the whole time; the compiler fences
//! around the clear keep the compiler from moving any store into `.bss`
//! across it.
//!
//! Logging starts after the clear, since the logger's own state lives in
//! `.bss`.

use core::marker::PhantomData;
use core::sync::atomic::{compiler_fence, Ordering};

use keystone_runtime::{memory_clear, parse_address, NumberFlags, AUTO_BASE};
use log::{debug, trace, warn};

use crate::arch::BootProtocol;
use crate::config::BootConfig;
use crate::descriptor::{DeviceDescriptor, VECTOR_TABLE_KEY};
use crate::error::{BootError, BootResult};
use crate::handoff::BootHandoff;
use crate::layout::ImageLayout;

/// A vector-table copy decided during planning
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VectorRelocation {
    /// Table address inside the image
    pub source: usize,
    /// Runtime address from the device descriptor
    pub destination: usize,
    /// Table size in bytes
    pub length: usize,
    /// Conditions the address parse reported
    pub flags: NumberFlags,
}

impl VectorRelocation {
    /// Whether the destination came from a clamped or unparsable value
    #[must_use]
    pub const fn is_suspect(&self) -> bool {
        self.flags
            .intersects(NumberFlags::OUT_OF_RANGE.union(NumberFlags::INVALID_BASE))
    }
}

/// Everything the sequence will do, decided before memory is touched
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BootPlan {
    /// Validated registers for the next stage
    pub handoff: BootHandoff,
    /// Vector table copy, if this boot performs one
    pub relocation: Option<VectorRelocation>,
}

/// The second-stage boot driver for protocol `P`
#[derive(Debug)]
pub struct BootSequence<'a, P, D: ?Sized> {
    layout: ImageLayout,
    descriptor: &'a D,
    config: BootConfig,
    protocol: PhantomData<P>,
}

impl<'a, P, D> BootSequence<'a, P, D>
where
    P: BootProtocol,
    D: DeviceDescriptor + ?Sized,
{
    /// A sequence over `layout`, reading properties from `descriptor`
    #[must_use]
    pub const fn new(layout: ImageLayout, descriptor: &'a D, config: BootConfig) -> Self {
        Self {
            layout,
            descriptor,
            config,
            protocol: PhantomData,
        }
    }

    /// The image layout this sequence clears and relocates within
    #[must_use]
    pub const fn layout(&self) -> &ImageLayout {
        &self.layout
    }

    /// Validate the registers and decide the relocation, touching nothing
    pub fn plan(&self, registers: P::Registers) -> BootResult<BootPlan> {
        let handoff = P::validate(registers, &self.layout)?;

        if self.config.descriptor_self_test && !self.descriptor.is_working() {
            return Err(BootError::DescriptorUnavailable);
        }

        let relocation = if P::RELOCATES_VECTORS && self.config.relocate_vectors {
            self.vector_relocation()?
        } else {
            None
        };

        Ok(BootPlan {
            handoff,
            relocation,
        })
    }

    /// Resolve where the vector table goes
    ///
    /// Parse conditions are recorded but do not fail the boot: a clamped
    /// address is still used.
    fn vector_relocation(&self) -> BootResult<Option<VectorRelocation>> {
        let Some((source, length)) = self.layout.vector_table() else {
            return Ok(None);
        };
        let value = self
            .descriptor
            .property(VECTOR_TABLE_KEY)
            .ok_or(BootError::MissingProperty {
                key: VECTOR_TABLE_KEY,
            })?;
        let parsed = parse_address(value.as_bytes(), AUTO_BASE);
        Ok(Some(VectorRelocation {
            source,
            destination: parsed.as_address(),
            length,
            flags: parsed.value.flags,
        }))
    }

    /// Run the sequence to one of its two ends
    ///
    /// On any validation failure `on_failure` is called with nothing else
    /// done. Otherwise `.bss` is cleared, the vector table copied when
    /// planned, and `on_success` receives the handoff. On the target both
    /// callbacks diverge and `R` is [`core::convert::Infallible`].
    ///
    /// # Safety
    ///
    /// The layout must describe the running image: `.bss` must be writable
    /// and hold nothing live (the stack included), and a planned vector
    /// destination must be writable for the table's length without
    /// overlapping it.
    pub unsafe fn run<R>(
        &self,
        registers: P::Registers,
        on_failure: impl FnOnce(BootError) -> R,
        on_success: impl FnOnce(BootHandoff) -> R,
    ) -> R {
        let plan = match self.plan(registers) {
            Ok(plan) => plan,
            Err(error) => return on_failure(error),
        };

        compiler_fence(Ordering::SeqCst);
        // SAFETY: the caller vouches for the .bss bounds
        unsafe {
            memory_clear(
                self.layout.bss_start as *mut u8,
                self.layout.bss_end as *mut u8,
            );
        }
        compiler_fence(Ordering::SeqCst);

        debug!(
            "cleared .bss [{:#x}, {:#x}), {} bytes",
            self.layout.bss_start,
            self.layout.bss_end,
            self.layout.bss_len()
        );

        if let Some(relocation) = plan.relocation {
            if relocation.is_suspect() {
                warn!(
                    "{} parsed with {:?}, using {:#x}",
                    VECTOR_TABLE_KEY, relocation.flags, relocation.destination
                );
            }
            trace!(
                "vector table {:#x} -> {:#x}, {} bytes",
                relocation.source,
                relocation.destination,
                relocation.length
            );
            // SAFETY: the caller vouches for the destination
            unsafe {
                keystone_runtime::copy(
                    relocation.destination as *mut u8,
                    relocation.source as *const u8,
                    relocation.length,
                );
            }
        }

        debug!("{} handoff {:?}", P::NAME, plan.handoff);
        on_success(plan.handoff)
    }
}
