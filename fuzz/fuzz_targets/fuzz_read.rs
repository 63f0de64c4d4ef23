#![no_main]
use libfuzzer_sys::fuzz_target;

fuzz_target!(|data: &[u8]| {
    if let Ok(file) = palsave::SavFile::from_slice(data) {
        let mut out = Vec::new();
        let _ = palsave::SavWriter::new()
            .magic(file.header().magic())
            .encode(file.data(), &mut out);
    }
});
