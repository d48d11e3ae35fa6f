/*++

Licensed under the Apache-2.0 license.

File Name:

    scenario.rs

Abstract:

    File contains the end to end runs driven by the emulator: the image
    round trip through the secure region and the plain passthrough check.

--*/

use smz_emu_bus::{Bus, BusError, Ram};
use smz_emu_periph::BusInterceptor;
use smz_emu_types::{RvAddr, RvData, RvSize};

/// Word written at index `i` of the test image
pub fn image_word(i: u32) -> RvData {
    0xAABB_0000 | ((i & 0xFF) << 8) | (i & 0xFF)
}

/// Word read back differently from what was written
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mismatch {
    pub index: u32,
    pub expected: RvData,
    pub actual: RvData,
}

/// Outcome of the image round trip
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageReport {
    pub base: RvAddr,
    pub words: u32,
    pub matches: u32,
    pub first_mismatch: Option<Mismatch>,

    /// (plaintext, word as stored in RAM) for the first few words
    pub at_rest: Vec<(RvData, RvData)>,
}

impl ImageReport {
    pub fn passed(&self) -> bool {
        self.matches == self.words
    }
}

const AT_REST_SAMPLES: u32 = 4;

/// Raw little-endian word in RAM, as seen by someone probing the chips
fn raw_word(ram: &Ram, addr: RvAddr) -> Option<RvData> {
    let start = addr as usize;
    let bytes = ram.data().get(start..start.checked_add(4)?)?;
    Some(u32::from_le_bytes([bytes[0], bytes[1], bytes[2], bytes[3]]))
}

/// Count read-back words equal to the image and find the first that is not
pub fn compare(read_back: &[RvData]) -> (u32, Option<Mismatch>) {
    let mut matches = 0;
    let mut first_mismatch = None;
    for (i, &actual) in (0u32..).zip(read_back) {
        let expected = image_word(i);
        if actual == expected {
            matches += 1;
        } else if first_mismatch.is_none() {
            first_mismatch = Some(Mismatch {
                index: i,
                expected,
                actual,
            });
        }
    }
    (matches, first_mismatch)
}

/// Write `words` image words at `base`, read them back and compare.
pub fn run_image(
    smz: &mut BusInterceptor<Ram>,
    base: RvAddr,
    words: u32,
) -> Result<ImageReport, BusError> {
    let addr_of = |i: u32| base.wrapping_add(4 * i);

    for i in 0..words {
        smz.write(RvSize::Word, addr_of(i), image_word(i))?;
    }
    log::info!("image: wrote {words} words at {base:#010x}");

    let read_back = (0..words)
        .map(|i| smz.read(RvSize::Word, addr_of(i)))
        .collect::<Result<Vec<_>, _>>()?;
    let (matches, first_mismatch) = compare(&read_back);

    let at_rest = (0..words.min(AT_REST_SAMPLES))
        .filter_map(|i| Some((image_word(i), raw_word(smz.memory(), addr_of(i))?)))
        .collect();

    Ok(ImageReport {
        base,
        words,
        matches,
        first_mismatch,
        at_rest,
    })
}

/// Value used for the passthrough check
pub const PASSTHROUGH_WORD: RvData = 0xCAFE_BEEF;

/// Outcome of a plain access outside the secure region
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PassthroughReport {
    pub addr: RvAddr,
    pub read_back: RvData,
    pub stored: Option<RvData>,
}

impl PassthroughReport {
    pub fn passed(&self) -> bool {
        self.read_back == PASSTHROUGH_WORD && self.stored == Some(PASSTHROUGH_WORD)
    }
}

/// Write and read back a known word at `addr`, and look at what RAM holds.
pub fn run_passthrough(
    smz: &mut BusInterceptor<Ram>,
    addr: RvAddr,
) -> Result<PassthroughReport, BusError> {
    smz.write(RvSize::Word, addr, PASSTHROUGH_WORD)?;
    let read_back = smz.read(RvSize::Word, addr)?;
    Ok(PassthroughReport {
        addr,
        read_back,
        stored: raw_word(smz.memory(), addr),
    })
}
