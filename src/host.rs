//! Host-side configurations for the SPL image.
//!
//! See [`SplBuilder::build`] to understand the linker script generation
//! steps.

// Please explicitly match all `Family` variants. If someone wants to add
// a new `Family`, this will help them find all the settings they need
// to consider.
#![warn(clippy::wildcard_enum_match_arm)]

use std::{
    env, fs,
    io::{self, Write},
    path::PathBuf,
};

use crate::soc;

/// TI processor family.
///
/// Supply this to a [`SplBuilder`] in order to check SPL configurations.
#[non_exhaustive]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Family {
    Am625,
}

impl Family {
    /// Family identifier, stored in the image.
    const fn id(self) -> u32 {
        match self {
            Family::Am625 => 625,
        }
    }
    /// Start of the SRAM that the SPL executes from.
    pub const fn sram_start(self) -> u32 {
        match self {
            Family::Am625 => soc::SRAM_START,
        }
    }
    /// Size of the SRAM that the SPL executes from.
    pub const fn sram_size(self) -> u32 {
        match self {
            Family::Am625 => soc::SRAM_SIZE,
        }
    }
    /// The page where ROM leaves its boot information, as `(start, size)`.
    pub const fn rom_boot_info(self) -> (u32, u32) {
        match self {
            Family::Am625 => (soc::ROM_BOOT_INFO_START, soc::ROM_BOOT_INFO_SIZE),
        }
    }
    const fn boot_param_table_index(self) -> u32 {
        match self {
            Family::Am625 => soc::BOOT_PARAM_TABLE_INDEX,
        }
    }
    const fn rom_extended_boot_data(self) -> u32 {
        match self {
            Family::Am625 => soc::ROM_EXTENDED_BOOT_DATA_INFO,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct EnvOverride {
    default: usize,
    env: Option<String>,
}

impl EnvOverride {
    const fn new(default: usize) -> Self {
        Self { default, env: None }
    }
    fn set_env_key(&mut self, key: String) {
        self.env = Some(key);
    }
    fn read(&self) -> Result<usize, Box<dyn std::error::Error>> {
        if let Some(env) = &self.env {
            // Re-run only when the most recently selected variable changes.
            println!("cargo:rerun-if-env-changed={env}");
        }

        if let Some(val) = self.env.as_ref().and_then(|key| env::var(key).ok()) {
            parse_size(&val)
        } else {
            Ok(self.default)
        }
    }
}

/// Parse a byte count, accepting a `k` or `K` suffix for KiB.
fn parse_size(val: &str) -> Result<usize, Box<dyn std::error::Error>> {
    let val = val.trim();
    if let Some(kib) = val.strip_suffix(&['k', 'K'][..]) {
        Ok(kib.parse::<usize>()? * 1024)
    } else {
        Ok(val.parse::<usize>()?)
    }
}

/// Builder for the SPL memory map.
///
/// `SplBuilder` sizes the SPL stack and malloc area and decides whether the
/// ROM boot-info page is off limits. Call [`build()`](SplBuilder::build) to
/// commit the configuration.
///
/// # Behaviors
///
/// Sections are packed into SRAM in this order: text, read-only data, data,
/// BSS, malloc area, stack. The stack sits at the highest addresses.
///
/// By default, the memory map ends below the ROM boot-info page. The
/// [`board_init_f`](crate::board_init_f) sequence copies that page before doing
/// anything else, so you may hand the page back to the SPL with
/// [`preserve_rom_boot_data(false)`](Self::preserve_rom_boot_data). Then the
/// stack may grow over the page.
///
/// # Default values
///
/// ```
/// use ti_spl::{Family, SplBuilder};
///
/// let mut b = SplBuilder::new(Family::Am625);
/// b.stack_size(16 * 1024);
/// b.heap_size(32 * 1024);
/// b.preserve_rom_boot_data(true);
/// b.linker_script_name("ti-spl-link.x");
///
/// assert_eq!(b, SplBuilder::new(Family::Am625));
/// ```
///
/// # Environment overrides
///
/// Use `*_env_override` methods to select the environment variable that
/// others may use to set a size, in bytes. A `k` or `K` suffix selects
/// multiples of 1024 bytes.
///
/// ```no_run
/// # use ti_spl::{Family, SplBuilder};
/// SplBuilder::new(Family::Am625)
///     .stack_size_env_override("SPL_STACK")
///     .heap_size_env_override("SPL_MALLOC")
///     .build()
///     .unwrap();
/// ```
///
/// If a user sets `SPL_STACK=8k`, the stack is 8192 bytes. Otherwise it's the
/// default. The builder doesn't consult the environment until you call
/// [`build()`](Self::build), so call order doesn't matter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SplBuilder {
    family: Family,
    stack_size: EnvOverride,
    heap_size: EnvOverride,
    preserve_rom_boot_data: bool,
    linker_script_name: String,
}

const DEFAULT_LINKER_SCRIPT_NAME: &str = "ti-spl-link.x";

/// Stack and malloc sizes must be multiples of this.
const SIZE_ALIGN: usize = 8;

impl SplBuilder {
    /// Creates an SPL that executes from on-chip SRAM.
    pub fn new(family: Family) -> Self {
        Self {
            family,
            stack_size: EnvOverride::new(16 * 1024),
            heap_size: EnvOverride::new(32 * 1024),
            preserve_rom_boot_data: true,
            linker_script_name: DEFAULT_LINKER_SCRIPT_NAME.into(),
        }
    }

    /// Set the size, in bytes, of the stack.
    pub fn stack_size(&mut self, bytes: usize) -> &mut Self {
        self.stack_size.default = bytes;
        self
    }
    /// Let end users override the stack size using an environment variable.
    ///
    /// See the [environment overrides](Self#environment-overrides) documentation
    /// for more information.
    pub fn stack_size_env_override(&mut self, key: impl AsRef<str>) -> &mut Self {
        self.stack_size.set_env_key(key.as_ref().into());
        self
    }
    /// Set the size, in bytes, of the SPL malloc area.
    pub fn heap_size(&mut self, bytes: usize) -> &mut Self {
        self.heap_size.default = bytes;
        self
    }
    /// Let end users override the malloc area size using an environment variable.
    ///
    /// See the [environment overrides](Self#environment-overrides) documentation
    /// for more information.
    pub fn heap_size_env_override(&mut self, key: impl AsRef<str>) -> &mut Self {
        self.heap_size.set_env_key(key.as_ref().into());
        self
    }
    /// Keep the ROM boot-info page out of the memory map.
    pub fn preserve_rom_boot_data(&mut self, preserve: bool) -> &mut Self {
        self.preserve_rom_boot_data = preserve;
        self
    }
    /// Set the name of the linker script file.
    pub fn linker_script_name(&mut self, name: &str) -> &mut Self {
        self.linker_script_name = name.into();
        self
    }

    /// Commit the SPL configuration.
    ///
    /// `build()` ensures that the generated linker script is available to the
    /// linker.
    ///
    /// # Errors
    ///
    /// Returns an error if
    ///
    /// - the stack is empty.
    /// - the stack or malloc size is not a multiple of 8 bytes.
    /// - the stack and malloc area alone exceed the usable SRAM.
    /// - an environment override can't be parsed.
    ///
    /// The linker signals an error if code and data don't fit in what's left.
    pub fn build(&self) -> Result<(), Box<dyn std::error::Error>> {
        // Since `build` is called from a build script, the output directory
        // represents the path to the _user's_ crate.
        let out_dir = PathBuf::from(env::var("OUT_DIR")?);
        println!("cargo:rustc-link-search={}", out_dir.display());

        let mut in_memory = Vec::new();
        self.write_linker_script(&mut in_memory)?;
        fs::write(out_dir.join(&self.linker_script_name), &in_memory)?;
        Ok(())
    }

    /// SRAM available to the SPL, as `(origin, length)`.
    fn sram_region(&self) -> (u32, u32) {
        let start = self.family.sram_start();
        if self.preserve_rom_boot_data {
            let (rom_start, _) = self.family.rom_boot_info();
            (start, rom_start - start)
        } else {
            (start, self.family.sram_size())
        }
    }

    /// Write the generated linker script into the provided writer.
    fn write_linker_script(
        &self,
        writer: &mut dyn Write,
    ) -> Result<(), Box<dyn std::error::Error>> {
        let stack_size = self.stack_size.read()?;
        let heap_size = self.heap_size.read()?;
        self.check_configurations(stack_size, heap_size)?;

        write_memory_map(writer, self.family, self.sram_region())?;

        // ROM handoff, for code that needs the raw addresses.
        writeln!(
            writer,
            "__ti_spl_boot_param_table_index = {:#010X};",
            self.family.boot_param_table_index()
        )?;
        writeln!(
            writer,
            "__ti_spl_rom_extended_boot_data = {:#010X};",
            self.family.rom_extended_boot_data()
        )?;
        writeln!(writer, "__stack_size = {stack_size:#010X};")?;
        writeln!(writer, "__heap_size = {heap_size:#010X};")?;
        writeln!(writer, "__ti_spl_family = {};", self.family.id())?;

        let link_x = include_bytes!("host/ti-spl-link.x");
        writer.write_all(link_x)?;

        Ok(())
    }

    /// Implement SPL sanity checks.
    ///
    /// This doesn't check that code fits. The linker does that.
    fn check_configurations(&self, stack_size: usize, heap_size: usize) -> Result<(), String> {
        if stack_size == 0 {
            return Err("The SPL stack cannot be empty".into());
        }
        for (name, size) in [("stack", stack_size), ("malloc", heap_size)] {
            if size % SIZE_ALIGN != 0 {
                return Err(format!(
                    "The SPL {name} size ({size}) must be a multiple of {SIZE_ALIGN} bytes"
                ));
            }
        }
        let (_, available) = self.sram_region();
        let requested = stack_size.saturating_add(heap_size);
        if requested >= available as usize {
            return Err(format!(
                "Chip {:?} has {available:#X} bytes of SRAM for the SPL. \
                 Cannot allocate a {stack_size:#X} byte stack and a {heap_size:#X} byte malloc area",
                self.family,
            ));
        }
        Ok(())
    }
}

/// Generate a linker script MEMORY command for the SPL's SRAM.
fn write_memory_map(output: &mut dyn Write, family: Family, sram: (u32, u32)) -> io::Result<()> {
    let (origin, length) = sram;
    writeln!(output, "/* Memory map for '{family:?}' SPL. */")?;
    writeln!(output, "MEMORY {{")?;
    writeln!(
        output,
        "SRAM (RWX) : ORIGIN = {origin:#X}, LENGTH = {length:#X}"
    )?;
    writeln!(output, "}}")?;
    Ok(())
}
