pub mod protocol;
pub mod transport;
pub mod types;

pub use protocol::McpProtocol;
pub use transport::{MessageReader, MessageWriter};
pub use types::{JsonRpcError, JsonRpcRequest, JsonRpcResponse, JSONRPC_VERSION, PROTOCOL_VERSION};
