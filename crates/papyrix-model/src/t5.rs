//! T5 model wrapper: Hub download, weight loading, and generation.

use std::sync::Mutex;
use std::time::Instant;

use candle_core::{DType, Device, Tensor, D};
use candle_nn::VarBuilder;
use candle_transformers::models::t5;
use hf_hub::api::sync::Api;
use tokenizers::Tokenizer;
use tracing::{debug, info};

use crate::assistant::TextGenerator;
use crate::generation::{beam_search, GenerationParams};
use crate::{ModelError, Result};

/// Loader configuration for the seq2seq model.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    pub model_id: String,
    /// Encoder input budget; prompts are truncated to this many tokens.
    pub max_input_tokens: usize,
    pub use_gpu: bool,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            model_id: "t5-large".to_string(),
            max_input_tokens: 512,
            use_gpu: false,
        }
    }
}

/// T5 conditional-generation model held for the process lifetime.
///
/// The model sits behind a mutex: candle's decoder takes `&mut self`, and
/// serializing generations matches the one-request-at-a-time execution model
/// of this service.
pub struct T5Generator {
    model: Mutex<t5::T5ForConditionalGeneration>,
    tokenizer: Tokenizer,
    t5_config: t5::Config,
    device: Device,
    config: GeneratorConfig,
}

impl T5Generator {
    /// Download (or reuse the hf-hub cache of) the model and load it.
    pub async fn new(config: GeneratorConfig) -> Result<Self> {
        let start = Instant::now();
        info!("Loading model: {}", config.model_id);

        let device = select_device(&config)?;
        debug!("Using device: {:?}", device);

        let model_id = config.model_id.clone();
        let (t5_config, tokenizer, weights_path) =
            tokio::task::spawn_blocking(move || download_model(&model_id))
                .await
                .map_err(|e| ModelError::Download(e.to_string()))??;

        let vb = unsafe {
            VarBuilder::from_mmaped_safetensors(&[weights_path], DType::F32, &device)
                .map_err(|e| ModelError::ModelLoad(e.to_string()))?
        };
        let model = t5::T5ForConditionalGeneration::load(vb, &t5_config)
            .map_err(|e| ModelError::ModelLoad(e.to_string()))?;

        info!("Model loaded in {:.2}s", start.elapsed().as_secs_f32());

        Ok(Self {
            model: Mutex::new(model),
            tokenizer,
            t5_config,
            device,
            config,
        })
    }

    /// Tokenize a prompt and truncate it to the encoder input budget,
    /// keeping the closing sentinel the tokenizer appended.
    fn encode_prompt(&self, prompt: &str) -> Result<Vec<u32>> {
        let encoding = self
            .tokenizer
            .encode(prompt, true)
            .map_err(|e| ModelError::Tokenization(e.to_string()))?;
        let mut ids: Vec<u32> = encoding.get_ids().to_vec();
        let eos = self.t5_config.eos_token_id as u32;
        if ids.len() > self.config.max_input_tokens {
            ids.truncate(self.config.max_input_tokens);
            if let Some(last) = ids.last_mut() {
                *last = eos;
            }
        }
        Ok(ids)
    }

    fn run_generation(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        let start = Instant::now();
        let input_ids = self.encode_prompt(prompt)?;
        debug!(input_tokens = input_ids.len(), "Encoding prompt");

        let input = Tensor::new(&input_ids[..], &self.device)?.unsqueeze(0)?;

        let mut model = self.model.lock().unwrap();
        let encoder_output = model.encode(&input)?;

        let start_token = self
            .t5_config
            .decoder_start_token_id
            .unwrap_or(self.t5_config.pad_token_id) as u32;
        let eos_token = self.t5_config.eos_token_id as u32;

        let device = self.device.clone();
        let output_ids = beam_search(
            |prefix: &[u32]| {
                let decoder_ids = Tensor::new(prefix, &device)?.unsqueeze(0)?;
                let logits = model.decode(&decoder_ids, &encoder_output)?;
                last_position_logprobs(&logits)
            },
            start_token,
            eos_token,
            params,
        )?;

        let text = self
            .tokenizer
            .decode(&output_ids, true)
            .map_err(|e| ModelError::Tokenization(e.to_string()))?;

        info!(
            output_tokens = output_ids.len(),
            elapsed_s = start.elapsed().as_secs_f32(),
            "Generation complete"
        );
        Ok(text.trim().to_string())
    }
}

#[async_trait::async_trait]
impl TextGenerator for T5Generator {
    async fn generate(&self, prompt: &str, params: &GenerationParams) -> Result<String> {
        self.run_generation(prompt, params)
    }

    fn model_id(&self) -> &str {
        &self.config.model_id
    }
}

/// Log-probabilities for the next token, taken from the decoder's final
/// position. With the KV cache off the decoder scores every prefix position,
/// so logits arrive as `[1, prefix_len, vocab]`; an already narrowed
/// `[1, vocab]` output passes through unchanged.
fn last_position_logprobs(logits: &Tensor) -> Result<Vec<f32>> {
    let logits = logits.squeeze(0)?;
    let logits = if logits.rank() == 2 {
        logits.get(logits.dim(0)? - 1)?
    } else {
        logits
    };
    let logprobs = candle_nn::ops::log_softmax(&logits, D::Minus1)?;
    Ok(logprobs.to_vec1::<f32>()?)
}

fn download_model(model_id: &str) -> Result<(t5::Config, Tokenizer, std::path::PathBuf)> {
    use hf_hub::{Repo, RepoType};

    let api = Api::new().map_err(|e| ModelError::Download(format!("API init: {}", e)))?;
    let repo = Repo::new(model_id.to_string(), RepoType::Model);
    let api_repo = api.repo(repo);

    let config_path = api_repo
        .get("config.json")
        .map_err(|e| ModelError::Download(format!("config.json: {}", e)))?;
    let config_content = std::fs::read_to_string(&config_path)?;
    let mut t5_config: t5::Config = serde_json::from_str(&config_content)
        .map_err(|e| ModelError::ModelLoad(format!("Parse config: {}", e)))?;
    // Beam hypotheses share one model instance; the KV cache assumes a
    // single running sequence, so each beam re-decodes its full prefix.
    t5_config.use_cache = false;

    let tokenizer_path = api_repo
        .get("tokenizer.json")
        .map_err(|e| ModelError::Download(format!("tokenizer.json: {}", e)))?;
    let tokenizer = Tokenizer::from_file(&tokenizer_path)
        .map_err(|e| ModelError::Tokenization(e.to_string()))?;

    let weights_path = api_repo
        .get("model.safetensors")
        .map_err(|e| ModelError::Download(format!("model weights: {}", e)))?;

    Ok((t5_config, tokenizer, weights_path))
}

fn select_device(config: &GeneratorConfig) -> Result<Device> {
    if !config.use_gpu {
        return Ok(Device::Cpu);
    }

    #[cfg(feature = "cuda")]
    {
        match Device::new_cuda(0) {
            Ok(device) => {
                info!("CUDA device available");
                return Ok(device);
            }
            Err(e) => {
                debug!("CUDA not available: {}, falling back to CPU", e);
            }
        }
    }

    #[cfg(feature = "metal")]
    {
        match Device::new_metal(0) {
            Ok(device) => {
                info!("Metal device available");
                return Ok(device);
            }
            Err(e) => {
                debug!("Metal not available: {}, falling back to CPU", e);
            }
        }
    }

    Ok(Device::Cpu)
}
