#![no_main]
use jsonval::Validator;
use libfuzzer_sys::fuzz_target;

fuzz_target!(|schema_and_instance: (Vec<u8>, Vec<u8>)| {
    let schema: serde_json::Value = match serde_json::from_slice(&schema_and_instance.0) {
        Ok(schema) => schema,
        Err(_) => return,
    };

    let compilation = jsonval::compile_with_options(
        &schema,
        jsonval::CompileOptions::new().with_max_depth(32),
    );

    // Only schemas that compile have anything to validate with.
    if let (Some(validator), Ok(instance)) = (
        compilation.validator(),
        serde_json::from_slice::<serde_json::Value>(&schema_and_instance.1),
    ) {
        if let Err(err) = validator.validate(&instance) {
            let _ = err.leaves();
        }
    }
});
