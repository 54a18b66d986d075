//! Loading and conversion of field-definition files.

use crate::error::ConfigFileError;
use crate::schema::{
    FieldsFile, RawField, RawFallback, RawInbound, RawObservability,
};
use iris_core::{
    ConfigError, DownstreamRequestEnrichment, DownstreamResponseExtraction, FallbackSource,
    FieldCatalog, FieldDefinition, InboundSource, MaskPattern, MetricSpec, ObservabilitySpec,
    ResponseEnrichment, TransformKind,
};
use std::path::Path;

/// Loads and validates field definitions from a TOML file.
pub fn load_fields(path: impl AsRef<Path>) -> Result<FieldCatalog, ConfigFileError> {
    let contents = std::fs::read_to_string(path)?;
    parse_fields(&contents)
}

/// Parses and validates field definitions from TOML text.
pub fn parse_fields(contents: &str) -> Result<FieldCatalog, ConfigFileError> {
    let file: FieldsFile = toml::from_str(contents)?;
    let definitions = file
        .fields
        .into_iter()
        .map(convert_field)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(FieldCatalog::new(definitions)?)
}

fn convert_field(raw: RawField) -> Result<FieldDefinition, ConfigFileError> {
    let mut builder = FieldDefinition::builder(&raw.name);

    if let Some(inbound) = raw.inbound {
        builder = builder.inbound(convert_inbound(&raw.name, inbound)?);
    }
    if let Some(response) = raw.response {
        builder = builder.response(ResponseEnrichment::new(response.kind, response.key));
    }
    if let Some(downstream) = raw.downstream_request {
        builder = builder.downstream_request(
            DownstreamRequestEnrichment::new(downstream.kind, downstream.key)
                .targets(downstream.targets),
        );
    }
    if let Some(extraction) = raw.downstream_response {
        let mut spec = DownstreamResponseExtraction::new(extraction.kind, extraction.selector);
        if let Some(default) = extraction.default {
            spec = spec.default_value(default);
        }
        if extraction.required {
            spec = spec.required();
        }
        builder = builder.downstream_response(spec);
    }

    if raw.sensitive {
        let mask = raw
            .mask
            .as_deref()
            .map(str::parse::<MaskPattern>)
            .transpose()
            .map_err(|e| ConfigError::InvalidMask {
                field: raw.name.clone(),
                detail: e.to_string(),
            })?;
        builder = builder.sensitive(mask);
    }

    if let Some(observability) = raw.observability {
        builder = builder.observability(convert_observability(observability));
    }

    Ok(builder.build())
}

fn convert_inbound(
    field_name: &str,
    raw: RawInbound,
) -> Result<InboundSource, ConfigFileError> {
    let mut source = InboundSource::new(raw.kind, raw.selector);
    if let Some(default) = raw.default {
        source = source.default_value(default);
    }
    if raw.required {
        source = source.required();
    }
    if let Some(generate) = raw.generate {
        source = source.generate(generate);
    }
    if let Some(fallback) = raw.fallback {
        source = source.fallback(convert_fallback(*fallback));
    }
    if let Some(validation) = raw.validation {
        source = source.validation(validation);
    }
    if let Some(transform) = raw.transform {
        let transform: TransformKind =
            transform
                .parse()
                .map_err(|source| ConfigFileError::InvalidTransform {
                    field: field_name.to_string(),
                    source,
                })?;
        source = source.transform(transform);
    }
    Ok(source)
}

fn convert_fallback(raw: RawFallback) -> FallbackSource {
    let mut fallback = FallbackSource::new(raw.kind, raw.selector);
    if let Some(next) = raw.fallback {
        fallback = fallback.then(convert_fallback(*next));
    }
    fallback
}

fn convert_observability(raw: RawObservability) -> ObservabilitySpec {
    ObservabilitySpec {
        log_key: raw.log_key,
        metric: raw.metric.map(|metric| MetricSpec {
            tag: metric.tag,
            cardinality: metric.cardinality,
        }),
        span_key: raw.span_key,
    }
}
