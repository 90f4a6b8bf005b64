mod ai_dto;

pub use ai_dto::{ChatRequestDto, ChatResponseDto, SummaryResponseDto};
