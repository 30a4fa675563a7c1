#![no_main]
use jsonval::{JsonType, TypeValidator, Validator};
use libfuzzer_sys::fuzz_target;

fuzz_target!(|types_and_instance: (Vec<JsonType>, Vec<u8>)| {
    let validator = TypeValidator::new(types_and_instance.0);

    if let Ok(instance) = serde_json::from_slice(&types_and_instance.1) {
        let accepted = validator.accepts(JsonType::of(&instance));
        assert_eq!(accepted, validator.validate(&instance).is_ok());
    }
});
