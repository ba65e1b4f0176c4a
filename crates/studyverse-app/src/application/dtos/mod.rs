mod activity_dto;
mod chat_dto;
mod session_dto;

pub use activity_dto::{ActivityOverviewDto, CalendarDayDto, StreakDto};
pub use chat_dto::{ChatMessageDto, ChatRoomDto, ParticipantDto};
pub use session_dto::SessionDto;
