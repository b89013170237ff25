//! Data Transfer Objects - request/response types for the API.

mod auth;
mod community;
mod post;
mod profile;

pub use auth::{AuthResponse, LoginRequest, RegisterUserRequest, UserResponse};
pub use community::{
    CommunityDto, CommunityMemberDto, CreateCommunityRequest, JoinedCommunityDto,
    MembershipChangeResponse,
};
pub use post::{
    CommentDto, CreateCommentRequest, CreatePostRequest, LikeToggleResponse, PagedResponse,
    PostDto, PostLikeDto, PostStatsDto, ReportPostRequest, ToggleBookmarkResponse,
    UpdatePostRequest,
};
pub use profile::{ProfileResponse, UpdateProfileRequest};
