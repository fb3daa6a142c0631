#![no_main]
use libfuzzer_sys::fuzz_target;
use robotsim_core::world::World;

fuzz_target!(|data: &[u8]| {
    // Arbitrary bytes must never panic the decoder.
    let _ = World::deserialize(data);
});
