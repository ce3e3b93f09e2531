pub mod todo_handlers;

pub use todo_handlers::{
    create_todo_handler, delete_todo_handler, get_todo_handler, list_todos_handler,
    update_todo_handler,
};
