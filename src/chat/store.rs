use std::collections::HashMap;
use std::sync::{Arc, Mutex, MutexGuard, RwLock};

use crate::error::{ChatError, ChatResult};
use crate::types::Turn;

/// 单个对话，消息只追加不重排
#[derive(Debug)]
struct Conversation {
    turns: Vec<Turn>,
}

impl Conversation {
    /// 时间戳不早于上一条，保证序列内非递减
    fn push(&mut self, mut turn: Turn) -> Turn {
        if let Some(last) = self.turns.last() {
            if turn.timestamp < last.timestamp {
                turn.timestamp = last.timestamp;
            }
        }
        self.turns.push(turn.clone());
        turn
    }
}

/// 内存中的对话存储
///
/// 外层读写锁只保护 id 到对话的映射；每个对话有自己的互斥锁，
/// 不同对话之间的追加互不阻塞。进程退出前对话不会被移除。
#[derive(Debug, Default)]
pub struct ConversationStore {
    conversations: RwLock<HashMap<String, Arc<Mutex<Conversation>>>>,
}

impl ConversationStore {
    pub fn new() -> Self {
        ConversationStore::default()
    }

    /// 以首条系统消息创建对话，返回新 id
    pub fn create(&self, seed: Turn) -> String {
        let id = uuid::Uuid::new_v4().to_string();
        let conversation = Conversation { turns: vec![seed] };

        self.conversations
            .write()
            .unwrap_or_else(|e| e.into_inner())
            .insert(id.clone(), Arc::new(Mutex::new(conversation)));

        id
    }

    /// 追加消息，返回实际写入的消息（时间戳可能被校正）
    pub fn append(&self, conversation_id: &str, turn: Turn) -> ChatResult<Turn> {
        let conversation = self.entry(conversation_id)?;
        let stored = lock(&conversation).push(turn);
        Ok(stored)
    }

    /// 按时间顺序返回全部消息的快照
    pub fn get(&self, conversation_id: &str) -> ChatResult<Vec<Turn>> {
        let conversation = self.entry(conversation_id)?;
        let turns = lock(&conversation).turns.clone();
        Ok(turns)
    }

    pub fn len(&self) -> usize {
        self.conversations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn entry(&self, conversation_id: &str) -> ChatResult<Arc<Mutex<Conversation>>> {
        self.conversations
            .read()
            .unwrap_or_else(|e| e.into_inner())
            .get(conversation_id)
            .cloned()
            .ok_or_else(|| ChatError::NotFound(conversation_id.to_string()))
    }
}

fn lock(conversation: &Mutex<Conversation>) -> MutexGuard<'_, Conversation> {
    conversation.lock().unwrap_or_else(|e| e.into_inner())
}
