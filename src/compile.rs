use crate::compound::conjoin;
use crate::{
    AdditionalItems, AdditionalPropertiesValidator, AllowedKeysValidator, CollectionValidator,
    CompoundValidator, DependenciesValidator, Dependency, Format, ItemsValidator,
    JsonObjectValidator, JsonType, KeyValuePairValidator, KeyedCollectionValidator, NumberValidator,
    PatternPropertiesValidator, RequiredKeysValidator, StringValidator, UniqueElementsValidator,
    ValueSetValidator, Validator,
};
use regex::Regex;
use serde::Serialize;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fmt;
use thiserror::Error;

/// Keywords that describe a schema without constraining data.
const METADATA_KEYWORDS: &[&str] = &[
    "$schema",
    "id",
    "title",
    "description",
    "default",
    "definitions",
];

/// Keywords that are understood but cannot be honored.
const UNSUPPORTED_KEYWORDS: &[&str] = &["$ref"];

#[derive(Clone, Debug, Default)]
pub struct CompileOptions {
    max_depth: usize,
    deny_unknown_keywords: bool,
}

impl CompileOptions {
    pub fn new() -> Self {
        Self::default()
    }

    /// Limits how deeply schemas may nest. Zero, the default, means no limit.
    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    /// Makes unrecognized keywords errors instead of warnings.
    pub fn with_deny_unknown_keywords(mut self, deny: bool) -> Self {
        self.deny_unknown_keywords = deny;
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase")]
pub enum CompileErrorKind {
    #[error("schema is not an object")]
    NotAnObject,

    #[error("{keyword} must be {expected}")]
    InvalidKeywordValue {
        keyword: String,
        expected: &'static str,
    },

    #[error("unknown type {name:?}")]
    UnknownType { name: String },

    #[error("invalid pattern {pattern:?}: {message}")]
    InvalidPattern { pattern: String, message: String },

    #[error("unknown keyword {keyword}")]
    UnknownKeyword { keyword: String },

    #[error("maximum schema depth exceeded")]
    MaxDepthExceeded,
}

/// A structural problem that prevents a schema from compiling.
#[derive(Clone, Debug, PartialEq, Eq, Error, Serialize)]
#[error("{kind} (at {})", pointer(.schema_path))]
pub struct CompileError {
    #[serde(rename = "schemaPath")]
    schema_path: Vec<String>,

    #[serde(flatten)]
    kind: CompileErrorKind,
}

impl CompileError {
    pub fn kind(&self) -> &CompileErrorKind {
        &self.kind
    }

    /// The tokens leading from the root schema to the offending keyword.
    pub fn schema_path(&self) -> &[String] {
        &self.schema_path
    }

    /// The keyword the error is about, if it is about one.
    pub fn keyword(&self) -> Option<&str> {
        match &self.kind {
            CompileErrorKind::NotAnObject | CompileErrorKind::MaxDepthExceeded => None,
            CompileErrorKind::InvalidKeywordValue { keyword, .. }
            | CompileErrorKind::UnknownKeyword { keyword } => Some(keyword.as_str()),
            _ => self.schema_path.last().map(String::as_str),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum WarningKind {
    /// The keyword is not part of the vocabulary and was ignored.
    UnrecognizedKeyword,
    /// The keyword is known, but this crate cannot validate it.
    UnsupportedKeyword,
    /// The `format` value names a format this crate cannot check.
    UnsupportedFormat,
}

/// A part of a schema that was ignored.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileWarning {
    schema_path: Vec<String>,
    keyword: String,
    kind: WarningKind,
}

impl CompileWarning {
    pub fn kind(&self) -> WarningKind {
        self.kind
    }

    pub fn keyword(&self) -> &str {
        &self.keyword
    }

    pub fn schema_path(&self) -> &[String] {
        &self.schema_path
    }
}

impl fmt::Display for CompileWarning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let what = match self.kind {
            WarningKind::UnrecognizedKeyword => "unrecognized keyword",
            WarningKind::UnsupportedKeyword => "unsupported keyword",
            WarningKind::UnsupportedFormat => "unsupported value of",
        };
        write!(f, "{} {} (at {})", what, self.keyword, pointer(&self.schema_path))
    }
}

/// The outcome of compiling a schema: a validator or the errors that
/// prevented one, plus any warnings either way.
#[derive(Debug)]
pub struct Compilation {
    outcome: Result<JsonObjectValidator, Vec<CompileError>>,
    warnings: Vec<CompileWarning>,
}

impl Compilation {
    pub fn is_ok(&self) -> bool {
        self.outcome.is_ok()
    }

    pub fn validator(&self) -> Option<&JsonObjectValidator> {
        self.outcome.as_ref().ok()
    }

    /// Empty if compilation succeeded.
    pub fn errors(&self) -> &[CompileError] {
        match &self.outcome {
            Ok(_) => &[],
            Err(errors) => errors,
        }
    }

    pub fn warnings(&self) -> &[CompileWarning] {
        &self.warnings
    }

    pub fn into_result(self) -> Result<JsonObjectValidator, Vec<CompileError>> {
        self.outcome
    }

    pub fn into_parts(
        self,
    ) -> (
        Result<JsonObjectValidator, Vec<CompileError>>,
        Vec<CompileWarning>,
    ) {
        (self.outcome, self.warnings)
    }
}

/// Compiles a JSON Schema (draft-04 vocabulary) into a validator.
///
/// ```
/// use jsonval::Validator;
/// use serde_json::json;
///
/// let compilation = jsonval::compile(&json!({
///     "type": "object",
///     "properties": {
///         "name": { "type": "string", "minLength": 1 },
///         "tags": { "type": "array", "items": { "type": "string" } }
///     },
///     "required": ["name"],
///     "x-internal": true
/// }));
///
/// assert_eq!(1, compilation.warnings().len());
/// let validator = compilation.validator().unwrap();
///
/// assert!(validator.validate(&json!({ "name": "a", "tags": ["b"] })).is_ok());
///
/// let err = validator.validate(&json!({ "name": "", "tags": [1] })).unwrap_err();
/// assert_eq!(
///     vec![
///         ("/name".to_owned(), "string has 0 characters, fewer than 1".to_owned()),
///         ("/tags/0".to_owned(), "expected string, found number".to_owned()),
///     ],
///     err.leaves()
/// );
/// ```
pub fn compile(schema: &Value) -> Compilation {
    compile_with_options(schema, CompileOptions::new())
}

pub fn compile_with_options(schema: &Value, options: CompileOptions) -> Compilation {
    let mut compiler = Compiler {
        options,
        depth: 0,
        schema_tokens: vec![],
        errors: vec![],
        warnings: vec![],
    };

    let validator = compiler.compile_schema(schema);

    tracing::trace!(
        errors = compiler.errors.len(),
        warnings = compiler.warnings.len(),
        "compiled schema"
    );

    let outcome = match validator {
        Some(validator) if compiler.errors.is_empty() => {
            Ok(validator.with_schema(schema.clone()))
        }
        _ => Err(compiler.errors),
    };

    Compilation {
        outcome,
        warnings: compiler.warnings,
    }
}

impl JsonObjectValidator {
    /// Same as [`compile`].
    pub fn from_schema(schema: &Value) -> Compilation {
        compile(schema)
    }
}

/// The types a `type` keyword declared.
struct Declared {
    types: BTreeSet<JsonType>,
    integer: bool,
}

enum Exclusive {
    Flag(bool),
    Bound(f64),
}

enum Items {
    Each(Box<dyn Validator>),
    Tuple(Vec<Box<dyn Validator>>),
}

enum Additional {
    Allowed(bool),
    Validated(Box<dyn Validator>),
}

/// Everything gathered from one schema object's keywords, before it is
/// assembled into a validator.
#[derive(Default)]
struct Draft {
    declared: Option<Declared>,
    common: Vec<Box<dyn Validator>>,

    number_keywords: bool,
    minimum: Option<f64>,
    maximum: Option<f64>,
    exclusive_minimum: Option<Exclusive>,
    exclusive_maximum: Option<Exclusive>,
    multiple_of: Option<f64>,

    string_keywords: bool,
    string: StringValidator,

    array_keywords: bool,
    items: Option<Items>,
    additional_items: Option<Additional>,
    min_items: Option<u64>,
    max_items: Option<u64>,
    unique_items: bool,

    object_keywords: bool,
    properties: Vec<KeyValuePairValidator>,
    pattern_properties: Vec<(Regex, Box<dyn Validator>)>,
    additional_properties: Option<Additional>,
    required: Vec<String>,
    min_properties: Option<u64>,
    max_properties: Option<u64>,
    dependencies: Vec<(String, Dependency)>,
}

impl Draft {
    fn number_branch(&mut self) -> Option<Box<dyn Validator>> {
        let integer = self.declared.as_ref().map_or(false, |d| d.integer);
        if !self.number_keywords && !integer {
            return None;
        }

        let mut number = NumberValidator::new();

        // With both forms present, the stricter bound wins.
        number = match (self.minimum, &self.exclusive_minimum) {
            (Some(min), Some(Exclusive::Flag(true))) => number.with_exclusive_minimum(min),
            (Some(min), Some(Exclusive::Bound(x))) if min > *x => number.with_minimum(min),
            (_, Some(Exclusive::Bound(x))) => number.with_exclusive_minimum(*x),
            (Some(min), _) => number.with_minimum(min),
            (None, _) => number,
        };

        number = match (self.maximum, &self.exclusive_maximum) {
            (Some(max), Some(Exclusive::Flag(true))) => number.with_exclusive_maximum(max),
            (Some(max), Some(Exclusive::Bound(x))) if max < *x => number.with_maximum(max),
            (_, Some(Exclusive::Bound(x))) => number.with_exclusive_maximum(*x),
            (Some(max), _) => number.with_maximum(max),
            (None, _) => number,
        };

        if let Some(divisor) = self.multiple_of {
            number = number.with_multiple_of(divisor);
        }

        if integer {
            number = number.with_integer();
        }

        Some(Box::new(number))
    }

    fn string_branch(&mut self) -> Option<Box<dyn Validator>> {
        if !self.string_keywords || self.string.is_unconstrained() {
            return None;
        }

        Some(Box::new(std::mem::take(&mut self.string)))
    }

    fn array_branch(&mut self) -> Option<Box<dyn Validator>> {
        let mut validators: Vec<Box<dyn Validator>> = vec![];
        let mut collection = CollectionValidator::new();

        if let Some(count) = count_validator(self.min_items, self.max_items) {
            collection = collection.with_count(count);
        }

        match self.items.take() {
            Some(Items::Each(item)) => {
                collection = collection.with_boxed_element_validator(item);
            }
            Some(Items::Tuple(items)) => {
                let additional = match self.additional_items.take() {
                    None | Some(Additional::Allowed(true)) => AdditionalItems::Allowed,
                    Some(Additional::Allowed(false)) => AdditionalItems::Forbidden,
                    Some(Additional::Validated(validator)) => AdditionalItems::Validated(validator),
                };
                validators.push(Box::new(ItemsValidator::new(items, additional)));
            }
            None => {}
        }

        if !collection.is_unconstrained() {
            validators.insert(0, Box::new(collection));
        }

        if self.unique_items {
            validators.push(Box::new(UniqueElementsValidator));
        }

        conjoin(validators)
    }

    fn object_branch(&mut self) -> Option<Box<dyn Validator>> {
        let mut validators: Vec<Box<dyn Validator>> = vec![];

        let mut keyed = KeyedCollectionValidator::new();
        if let Some(count) = count_validator(self.min_properties, self.max_properties) {
            keyed = keyed.with_count(count);
        }

        if let Some(additional) = self.additional_properties.take() {
            let known = AllowedKeysValidator::new(
                self.properties.iter().map(|p| p.key().to_owned()),
                self.pattern_properties.iter().map(|(p, _)| p.clone()).collect(),
            );

            match additional {
                Additional::Allowed(false) => keyed = keyed.with_key_validator(known),
                Additional::Validated(validator) => validators.push(Box::new(
                    AdditionalPropertiesValidator::new(known, validator),
                )),
                Additional::Allowed(true) => {}
            }
        }

        let keyed = keyed.with_pairs(self.properties.drain(..));
        if !keyed.is_unconstrained() {
            validators.insert(0, Box::new(keyed));
        }

        if !self.required.is_empty() {
            validators.push(Box::new(RequiredKeysValidator::new(self.required.drain(..))));
        }

        if !self.pattern_properties.is_empty() {
            validators.push(Box::new(PatternPropertiesValidator::new(
                self.pattern_properties.drain(..).collect(),
            )));
        }

        if !self.dependencies.is_empty() {
            validators.push(Box::new(DependenciesValidator::new(
                self.dependencies.drain(..).collect(),
            )));
        }

        conjoin(validators)
    }

    fn finish(mut self) -> JsonObjectValidator {
        let mut present = vec![];
        if self.object_keywords {
            present.push((JsonType::Object, self.object_branch()));
        }
        if self.array_keywords {
            present.push((JsonType::Array, self.array_branch()));
        }
        if self.string_keywords {
            present.push((JsonType::String, self.string_branch()));
        }
        let integer = self.declared.as_ref().map_or(false, |d| d.integer);
        if self.number_keywords || integer {
            present.push((JsonType::Number, self.number_branch()));
        }

        let common = conjoin(std::mem::take(&mut self.common));

        let gated = |branches: Vec<(JsonType, Option<Box<dyn Validator>>)>| {
            conjoin(
                branches
                    .into_iter()
                    .filter_map(|(t, branch)| {
                        branch.map(|b| {
                            Box::new(JsonObjectValidator::new(None, Some(b), t, false))
                                as Box<dyn Validator>
                        })
                    })
                    .collect(),
            )
        };

        match self.declared {
            Some(declared) if declared.types.contains(&JsonType::Any) => {
                JsonObjectValidator::new(common, gated(present), JsonType::Any, true)
            }
            Some(declared) if declared.types.len() == 1 => {
                let declared_type = declared
                    .types
                    .iter()
                    .next()
                    .copied()
                    .unwrap_or(JsonType::Any);
                let branch = present
                    .into_iter()
                    .find(|(t, _)| *t == declared_type)
                    .and_then(|(_, branch)| branch);
                JsonObjectValidator::new(common, branch, declared_type, true)
            }
            Some(declared) => {
                let branches = present
                    .into_iter()
                    .filter(|(t, _)| declared.types.contains(t))
                    .collect();
                JsonObjectValidator::ambiguous(common, gated(branches), declared.types, true)
            }
            None => {
                let candidates: Vec<_> = present.iter().map(|(t, _)| *t).collect();
                JsonObjectValidator::ambiguous(common, gated(present), candidates, false)
            }
        }
    }
}

fn count_validator(min: Option<u64>, max: Option<u64>) -> Option<NumberValidator> {
    if min.is_none() && max.is_none() {
        return None;
    }

    let mut count = NumberValidator::new();
    if let Some(min) = min {
        count = count.with_minimum(min as f64);
    }
    if let Some(max) = max {
        count = count.with_maximum(max as f64);
    }
    Some(count)
}

struct Compiler {
    options: CompileOptions,
    depth: usize,
    schema_tokens: Vec<String>,
    errors: Vec<CompileError>,
    warnings: Vec<CompileWarning>,
}

impl Compiler {
    fn compile_schema(&mut self, schema: &Value) -> Option<JsonObjectValidator> {
        let obj = match schema.as_object() {
            Some(obj) => obj,
            None => {
                self.push_error(CompileErrorKind::NotAnObject);
                return None;
            }
        };

        if self.options.max_depth != 0 && self.depth == self.options.max_depth {
            self.push_error(CompileErrorKind::MaxDepthExceeded);
            return None;
        }

        self.depth += 1;
        let errors_before = self.errors.len();
        let mut draft = Draft::default();

        for (keyword, value) in obj {
            self.push_schema_token(keyword);
            self.compile_keyword(&mut draft, keyword, value);
            self.pop_schema_token();
        }

        self.depth -= 1;

        if self.errors.len() > errors_before {
            None
        } else {
            Some(draft.finish())
        }
    }

    fn compile_keyword(&mut self, draft: &mut Draft, keyword: &str, value: &Value) {
        match keyword {
            "type" => draft.declared = self.compile_type(value),

            "enum" => match value.as_array() {
                Some(values) if !values.is_empty() => {
                    draft
                        .common
                        .push(Box::new(ValueSetValidator::new(values.iter().cloned())));
                }
                _ => self.invalid(keyword, "a non-empty array"),
            },
            "allOf" | "anyOf" | "oneOf" => {
                if let Some(validators) = self.compile_schema_array(keyword, value) {
                    let compound = match keyword {
                        "allOf" => CompoundValidator::and(validators),
                        "anyOf" => CompoundValidator::or(validators),
                        _ => CompoundValidator::mutual_exclusion(validators),
                    };
                    draft.common.push(Box::new(compound));
                }
            }
            "not" => {
                if let Some(validator) = self.compile_schema(value) {
                    draft.common.push(Box::new(CompoundValidator::not(validator)));
                }
            }

            "minimum" | "maximum" => {
                draft.number_keywords = true;
                match value {
                    Value::Number(n) => {
                        let n = n.as_f64();
                        if keyword == "minimum" {
                            draft.minimum = n;
                        } else {
                            draft.maximum = n;
                        }
                    }
                    _ => self.invalid(keyword, "a number"),
                }
            }
            "exclusiveMinimum" | "exclusiveMaximum" => {
                draft.number_keywords = true;
                let exclusive = match value {
                    Value::Bool(b) => Exclusive::Flag(*b),
                    Value::Number(n) => Exclusive::Bound(n.as_f64().unwrap_or(f64::NAN)),
                    _ => return self.invalid(keyword, "a boolean or a number"),
                };
                if keyword == "exclusiveMinimum" {
                    draft.exclusive_minimum = Some(exclusive);
                } else {
                    draft.exclusive_maximum = Some(exclusive);
                }
            }
            "multipleOf" => {
                draft.number_keywords = true;
                match value.as_f64() {
                    Some(divisor) if divisor > 0.0 => {
                        draft.multiple_of = Some(divisor);
                    }
                    _ => self.invalid(keyword, "a number greater than 0"),
                }
            }

            "minLength" | "maxLength" => {
                draft.string_keywords = true;
                if let Some(n) = self.non_negative_integer(keyword, value) {
                    let string = std::mem::take(&mut draft.string);
                    draft.string = if keyword == "minLength" {
                        string.with_min_length(n)
                    } else {
                        string.with_max_length(n)
                    };
                }
            }
            "pattern" => {
                draft.string_keywords = true;
                match value.as_str() {
                    Some(pattern) => {
                        if let Some(regex) = self.compile_pattern(pattern) {
                            let string = std::mem::take(&mut draft.string);
                            draft.string = string.with_regex(regex);
                        }
                    }
                    None => self.invalid(keyword, "a string"),
                }
            }
            "format" => {
                draft.string_keywords = true;
                match value.as_str().map(str::parse::<Format>) {
                    Some(Ok(format)) => {
                        let string = std::mem::take(&mut draft.string);
                        draft.string = string.with_format(format);
                    }
                    Some(Err(())) => self.push_warning(keyword, WarningKind::UnsupportedFormat),
                    None => self.invalid(keyword, "a string"),
                }
            }

            "items" => {
                draft.array_keywords = true;
                match value {
                    Value::Object(_) => {
                        if let Some(item) = self.compile_schema(value) {
                            draft.items = Some(Items::Each(Box::new(item)));
                        }
                    }
                    Value::Array(_) => {
                        if let Some(items) = self.compile_schema_list(value) {
                            draft.items = Some(Items::Tuple(items));
                        }
                    }
                    _ => self.invalid(keyword, "a schema or an array of schemas"),
                }
            }
            "additionalItems" => {
                draft.array_keywords = true;
                draft.additional_items = self.compile_additional(keyword, value);
            }
            "minItems" | "maxItems" => {
                draft.array_keywords = true;
                let n = self.non_negative_integer(keyword, value);
                if keyword == "minItems" {
                    draft.min_items = n;
                } else {
                    draft.max_items = n;
                }
            }
            "uniqueItems" => {
                draft.array_keywords = true;
                match value.as_bool() {
                    Some(unique) => draft.unique_items = unique,
                    None => self.invalid(keyword, "a boolean"),
                }
            }

            "properties" => {
                draft.object_keywords = true;
                if let Some(properties) = self.schema_map(keyword, value) {
                    for (name, sub_schema) in properties {
                        self.push_schema_token(name);
                        if let Some(validator) = self.compile_schema(sub_schema) {
                            draft
                                .properties
                                .push(KeyValuePairValidator::new(name.clone(), validator));
                        }
                        self.pop_schema_token();
                    }
                }
            }
            "patternProperties" => {
                draft.object_keywords = true;
                if let Some(properties) = self.schema_map(keyword, value) {
                    for (pattern, sub_schema) in properties {
                        self.push_schema_token(pattern);
                        let regex = self.compile_pattern(pattern);
                        let validator = self.compile_schema(sub_schema);
                        if let (Some(regex), Some(validator)) = (regex, validator) {
                            let validator: Box<dyn Validator> = Box::new(validator);
                            draft.pattern_properties.push((regex, validator));
                        }
                        self.pop_schema_token();
                    }
                }
            }
            "additionalProperties" => {
                draft.object_keywords = true;
                draft.additional_properties = self.compile_additional(keyword, value);
            }
            "required" => {
                draft.object_keywords = true;
                match string_list(value) {
                    Some(keys) => draft.required = keys,
                    None => self.invalid(keyword, "an array of strings"),
                }
            }
            "minProperties" | "maxProperties" => {
                draft.object_keywords = true;
                let n = self.non_negative_integer(keyword, value);
                if keyword == "minProperties" {
                    draft.min_properties = n;
                } else {
                    draft.max_properties = n;
                }
            }
            "dependencies" => {
                draft.object_keywords = true;
                if let Some(dependencies) = self.compile_dependencies(value) {
                    draft.dependencies = dependencies;
                }
            }

            _ if METADATA_KEYWORDS.contains(&keyword) => {}
            _ if UNSUPPORTED_KEYWORDS.contains(&keyword) => {
                self.push_warning(keyword, WarningKind::UnsupportedKeyword)
            }
            _ if self.options.deny_unknown_keywords => {
                self.push_error(CompileErrorKind::UnknownKeyword {
                    keyword: keyword.to_owned(),
                })
            }
            _ => self.push_warning(keyword, WarningKind::UnrecognizedKeyword),
        }
    }

    fn compile_type(&mut self, value: &Value) -> Option<Declared> {
        let names: Vec<&str> = match value {
            Value::String(name) => vec![name.as_str()],
            Value::Array(names) if !names.is_empty() => {
                match names.iter().map(Value::as_str).collect::<Option<Vec<_>>>() {
                    Some(names) => names,
                    None => {
                        self.invalid("type", "a type name or a non-empty array of type names");
                        return None;
                    }
                }
            }
            _ => {
                self.invalid("type", "a type name or a non-empty array of type names");
                return None;
            }
        };

        let mut types = BTreeSet::new();
        let mut integer = false;
        let mut number = false;
        let mut unknown = false;

        for name in names {
            match name {
                "integer" => integer = true,
                "boolean" => number = true,
                _ => match name.parse::<JsonType>() {
                    Ok(JsonType::Number) => number = true,
                    Ok(t) => {
                        types.insert(t);
                    }
                    Err(()) => {
                        self.push_error(CompileErrorKind::UnknownType {
                            name: name.to_owned(),
                        });
                        unknown = true;
                    }
                },
            }
        }

        if unknown {
            return None;
        }

        if integer || number {
            types.insert(JsonType::Number);
        }

        // `any` admits every number, so it also lifts the integer requirement.
        let any = types.contains(&JsonType::Any);
        if any {
            types = std::iter::once(JsonType::Any).collect();
        }

        Some(Declared {
            types,
            integer: integer && !number && !any,
        })
    }

    /// Compiles a non-empty array of schemas, as used by the combinators.
    fn compile_schema_array(
        &mut self,
        keyword: &str,
        value: &Value,
    ) -> Option<Vec<Box<dyn Validator>>> {
        match value.as_array() {
            Some(schemas) if !schemas.is_empty() => self.compile_schema_list(value),
            _ => {
                self.invalid(keyword, "a non-empty array of schemas");
                None
            }
        }
    }

    fn compile_schema_list(&mut self, value: &Value) -> Option<Vec<Box<dyn Validator>>> {
        let schemas = value.as_array()?;
        let mut validators: Vec<Box<dyn Validator>> = Vec::with_capacity(schemas.len());
        let mut failed = false;

        for (index, schema) in schemas.iter().enumerate() {
            self.push_schema_token(&index.to_string());
            match self.compile_schema(schema) {
                Some(validator) => validators.push(Box::new(validator)),
                None => failed = true,
            }
            self.pop_schema_token();
        }

        if failed {
            None
        } else {
            Some(validators)
        }
    }

    fn compile_additional(&mut self, keyword: &str, value: &Value) -> Option<Additional> {
        match value {
            Value::Bool(allowed) => Some(Additional::Allowed(*allowed)),
            Value::Object(_) => self
                .compile_schema(value)
                .map(|validator| Additional::Validated(Box::new(validator))),
            _ => {
                self.invalid(keyword, "a boolean or a schema");
                None
            }
        }
    }

    fn compile_dependencies(&mut self, value: &Value) -> Option<Vec<(String, Dependency)>> {
        let dependencies = match value.as_object() {
            Some(dependencies) => dependencies,
            None => {
                self.invalid("dependencies", "an object");
                return None;
            }
        };

        let mut out = Vec::with_capacity(dependencies.len());
        for (key, dependency) in dependencies {
            self.push_schema_token(key);
            match dependency {
                Value::Object(_) => {
                    if let Some(validator) = self.compile_schema(dependency) {
                        out.push((key.clone(), Dependency::Validated(Box::new(validator))));
                    }
                }
                _ => match string_list(dependency) {
                    Some(keys) => out.push((key.clone(), Dependency::Keys(keys))),
                    None => self.invalid("dependencies", "an array of strings or a schema"),
                },
            }
            self.pop_schema_token();
        }

        Some(out)
    }

    fn schema_map<'a>(
        &mut self,
        keyword: &str,
        value: &'a Value,
    ) -> Option<&'a Map<String, Value>> {
        let map = value.as_object();
        if map.is_none() {
            self.invalid(keyword, "an object of schemas");
        }
        map
    }

    fn compile_pattern(&mut self, pattern: &str) -> Option<Regex> {
        match Regex::new(pattern) {
            Ok(regex) => Some(regex),
            Err(err) => {
                self.push_error(CompileErrorKind::InvalidPattern {
                    pattern: pattern.to_owned(),
                    message: err.to_string(),
                });
                None
            }
        }
    }

    fn non_negative_integer(&mut self, keyword: &str, value: &Value) -> Option<u64> {
        let n = value.as_u64();
        if n.is_none() {
            self.invalid(keyword, "a non-negative integer");
        }
        n
    }

    fn invalid(&mut self, keyword: &str, expected: &'static str) {
        self.push_error(CompileErrorKind::InvalidKeywordValue {
            keyword: keyword.to_owned(),
            expected,
        });
    }

    fn push_error(&mut self, kind: CompileErrorKind) {
        let error = CompileError {
            schema_path: self.schema_tokens.clone(),
            kind,
        };
        tracing::debug!(%error, "schema error");
        self.errors.push(error);
    }

    fn push_warning(&mut self, keyword: &str, kind: WarningKind) {
        let warning = CompileWarning {
            schema_path: self.schema_tokens.clone(),
            keyword: keyword.to_owned(),
            kind,
        };
        tracing::debug!(%warning, "schema warning");
        self.warnings.push(warning);
    }

    fn push_schema_token(&mut self, token: &str) {
        self.schema_tokens.push(token.to_owned());
    }

    fn pop_schema_token(&mut self) {
        self.schema_tokens.pop();
    }
}

fn string_list(value: &Value) -> Option<Vec<String>> {
    value
        .as_array()?
        .iter()
        .map(|v| v.as_str().map(str::to_owned))
        .collect()
}

fn pointer(tokens: &[String]) -> String {
    let mut out = String::from("#");
    for token in tokens {
        out.push('/');
        out.push_str(&token.replace('~', "~0").replace('/', "~1"));
    }
    out
}
