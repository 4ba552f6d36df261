//! Safetensors weight loading.

use std::collections::HashMap;
use std::path::Path;

use anyhow::{Context, Result};
use candle_core::{DType, Device, Tensor};
use candle_nn::VarBuilder;
use safetensors::SafeTensors;
use tracing::debug;

/// Reads a safetensors file and exposes its tensors through a `VarBuilder`.
///
/// # Errors
///
/// Returns an error if the file cannot be read, the safetensors payload is
/// invalid, or a tensor has an unsupported dtype.
pub fn load_safetensors(path: impl AsRef<Path>, device: &Device) -> Result<VarBuilder<'static>> {
    let path = path.as_ref();
    debug!("loading weights from {}", path.display());

    let data = std::fs::read(path)
        .with_context(|| format!("Failed to read model file: {}", path.display()))?;

    let tensors = SafeTensors::deserialize(&data)
        .with_context(|| format!("Failed to parse safetensors: {}", path.display()))?;

    let mut tensor_map: HashMap<String, Tensor> = HashMap::new();
    for name in tensors.names() {
        let view = tensors
            .tensor(name)
            .with_context(|| format!("Failed to get tensor '{name}'"))?;

        let dtype = dtype_to_candle(view.dtype())?;
        let shape: Vec<usize> = view.shape().to_vec();
        let tensor = Tensor::from_raw_buffer(view.data(), dtype, &shape, device)
            .with_context(|| format!("Failed to create tensor '{name}'"))?;
        tensor_map.insert(name.clone(), tensor);
    }

    Ok(VarBuilder::from_tensors(tensor_map, DType::F32, device))
}

fn dtype_to_candle(dtype: safetensors::Dtype) -> Result<DType> {
    use safetensors::Dtype as S;
    match dtype {
        S::F32 => Ok(DType::F32),
        S::F64 => Ok(DType::F64),
        S::F16 => Ok(DType::F16),
        S::BF16 => Ok(DType::BF16),
        S::I64 => Ok(DType::I64),
        S::U8 => Ok(DType::U8),
        S::U32 => Ok(DType::U32),
        other => anyhow::bail!("Unsupported dtype: {other:?}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[allow(clippy::expect_used)]
    fn write_test_weights() -> NamedTempFile {
        use safetensors::serialize;
        use safetensors::tensor::TensorView;

        let data: Vec<f32> = vec![0.5, -0.5, 1.0, 0.0];
        let bytes: &[u8] = bytemuck::cast_slice(&data);
        let view = TensorView::new(safetensors::Dtype::F32, vec![4], bytes)
            .expect("valid tensor view");
        let tensors = HashMap::from([("weights".to_string(), view)]);
        let serialized = serialize(&tensors, &None).expect("serialize");

        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(&serialized).expect("write");
        file
    }

    #[test]
    fn test_load_safetensors() {
        let file = write_test_weights();
        assert!(load_safetensors(file.path(), &Device::Cpu).is_ok());
    }

    #[test]
    fn test_load_safetensors_missing_file() {
        assert!(load_safetensors("/nonexistent/weights.safetensors", &Device::Cpu).is_err());
    }

    #[test]
    fn test_load_safetensors_garbage_payload() {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(b"not a safetensors payload").expect("write");
        assert!(load_safetensors(file.path(), &Device::Cpu).is_err());
    }
}
