pub mod access_token;
pub mod todo;
pub mod user;


pub use access_token::{AccessToken, AuthenticatedUser};
pub use todo::{
    CreateTodoRequest, MessageResponse, Todo, TodoChanges, TodoListResponse, TodoMutationResponse,
    TodoResponse, UpdateTodoRequest,
};
pub use user::{AuthResponse, LoginRequest, RegisterRequest, User, UserResponse};
