use super::GenerationError;

/// Remote text-generation client abstraction (allows mocking)
pub trait LlmClient {
    /// Send one prompt and return the generated text unmodified.
    fn generate(&self, prompt: &str) -> Result<String, GenerationError>;

    /// Identifier of the model this client was built for.
    fn model_name(&self) -> &str;
}

impl<T: LlmClient + ?Sized> LlmClient for Box<T> {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

impl<T: LlmClient + ?Sized> LlmClient for &T {
    fn generate(&self, prompt: &str) -> Result<String, GenerationError> {
        (**self).generate(prompt)
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}
