// 領域層: 核心模型與埠 (時間來源, 播報輸出)

pub mod model;
pub mod ports;
