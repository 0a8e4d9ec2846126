use crate::{
    cartridge::{Cartridge, CartridgeError},
    cpu::Cpu,
    hardware::DmgRevision,
    mmu::Mmu,
};

/// T-cycles per video frame (154 scanlines of 456 dots).
pub const FRAME_CYCLES: u32 = 70_224;

/// One emulated machine: CPU, memory map and the frame pacing counter.
///
/// A `System` is a plain value around 64 KiB in size. It owns no handles
/// and allocates nothing after [`System::load_rom`]; run one instance per
/// thread for batch workloads. The ROM is borrowed and must outlive the
/// system.
pub struct System<'a> {
    pub cpu: Cpu,
    pub mmu: Mmu<'a>,
    revision: DmgRevision,
    frame_cycles: u32,
}

impl<'a> System<'a> {
    /// A powered-off machine with no cartridge inserted.
    pub fn new() -> Self {
        Self::with_revision(DmgRevision::default())
    }

    pub fn with_revision(revision: DmgRevision) -> Self {
        Self {
            cpu: Cpu::new(),
            mmu: Mmu::new(),
            revision,
            frame_cycles: 0,
        }
    }

    /// Validate `rom` and power on with it inserted. Execution starts from
    /// the zeroed pre-boot state; call [`System::skip_boot_rom`] to jump to
    /// the cartridge entry point.
    pub fn load_rom(&mut self, rom: &'a [u8]) -> Result<(), CartridgeError> {
        let cart = match Cartridge::from_header(rom) {
            Ok(cart) => cart,
            Err(err) => {
                core_log!(Warn, "cartridge", "rejected ROM: {err}");
                return Err(err);
            }
        };

        self.cpu = Cpu::new();
        self.mmu = Mmu::new();
        self.mmu.rom = rom;
        self.mmu.cart = cart;
        self.frame_cycles = 0;

        core_log!(
            Info,
            "cartridge",
            "loaded ROM: title={:?} mbc={:?} rom_banks={} ram={}B",
            String::from_utf8_lossy(crate::cartridge::Header::parse(rom).title()),
            cart.mbc(),
            cart.rom_banks(),
            cart.ram_size(),
        );
        Ok(())
    }

    /// Apply the register and IO state the boot ROM would leave behind and
    /// start at the cartridge entry point (PC=0x0100).
    pub fn skip_boot_rom(&mut self) {
        self.cpu.apply_post_boot(self.revision);
        self.mmu.if_reg = 0x01;
        self.mmu.timer.div = self.revision.post_boot_div();
    }

    /// Power-cycle: back to the pre-boot state with the same ROM inserted.
    pub fn reset(&mut self) {
        let rom = self.mmu.rom;
        self.cpu = Cpu::new();
        self.mmu = Mmu::new();
        self.frame_cycles = 0;
        if let Ok(cart) = Cartridge::from_header(rom) {
            self.mmu.rom = rom;
            self.mmu.cart = cart;
        }
    }

    /// Run one CPU step and bring the timer up to date behind it. Returns
    /// the T-cycles consumed.
    pub fn step(&mut self) -> u8 {
        let cycles = self.cpu.step(&mut self.mmu);
        self.mmu.timer.tick(cycles as u32, &mut self.mmu.if_reg);
        self.frame_cycles += cycles as u32;
        cycles
    }

    /// Run until a frame's worth of T-cycles has elapsed. Overshoot carries
    /// into the next frame so long-term pacing is exact.
    pub fn frame(&mut self) {
        while self.frame_cycles < FRAME_CYCLES {
            self.step();
        }
        self.frame_cycles -= FRAME_CYCLES;
    }

    /// Replace the button state. `mask` is active-high with bits
    /// {0=A, 1=B, 2=Select, 3=Start, 4=Right, 5=Left, 6=Up, 7=Down}.
    pub fn set_input(&mut self, mask: u8) {
        self.mmu.input.set_state(mask);
    }

    /// Observe any memory-mapped location.
    pub fn read(&self, addr: u16) -> u8 {
        self.mmu.read(addr)
    }

    /// Inject a write at any memory-mapped location.
    pub fn write(&mut self, addr: u16, val: u8) {
        self.mmu.write(addr, val);
    }

    /// Contiguous feature-extraction window: WRAM at offset 0, HRAM at
    /// offset [`crate::mmu::HRAM_BASE`].
    pub fn ram(&self) -> &[u8] {
        self.mmu.ram()
    }

    /// The battery-save payload: the live external-RAM window.
    pub fn save_ram(&self) -> &[u8] {
        self.mmu.eram()
    }

    /// Consume the pending serial byte, if any. Blargg test ROMs report
    /// their results through this channel.
    pub fn take_serial(&mut self) -> Option<u8> {
        self.mmu.serial.take()
    }

    /// Total T-cycles executed since power-on.
    pub fn cycles(&self) -> u64 {
        self.cpu.cycles
    }
}

impl Default for System<'_> {
    fn default() -> Self {
        Self::new()
    }
}
