//! UseCase 層
//!
//! ルーム参加・描画の中継・キャンバス状態の同期・切断時のクリーンアップを実装するレイヤー。
//! UI 層から呼び出され、Domain 層を操作します。

pub mod disconnect_connection;
pub mod error;
pub mod join_room;
pub mod relay_drawing;
pub mod session;
pub mod update_canvas;

pub use disconnect_connection::DisconnectConnectionUseCase;
pub use error::EventError;
pub use join_room::JoinRoomUseCase;
pub use relay_drawing::RelayDrawingUseCase;
pub use session::SessionCoordinator;
pub use update_canvas::{CanvasUpdate, UpdateCanvasUseCase};
