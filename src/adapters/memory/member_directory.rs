use crate::domain::value_objects::MemberId;
use crate::ports::member_directory::{Member, MemberDirectory as MemberDirectoryTrait, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// MemberDirectoryのインメモリ実装
///
/// 会員は外部コンテキストが所有する参照データ。
/// ここでは登録ヘルパー付きの読み取り専用ビューとして実装する。
pub struct MemoryMemberDirectory {
    members: Mutex<HashMap<MemberId, Member>>,
}

impl MemoryMemberDirectory {
    pub fn new() -> Self {
        Self {
            members: Mutex::new(HashMap::new()),
        }
    }

    /// 会員を登録する（外部の会員ディレクトリの代替）
    pub fn add_member(&self, member: Member) {
        self.members.lock().unwrap().insert(member.member_id, member);
    }
}

impl Default for MemoryMemberDirectory {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl MemberDirectoryTrait for MemoryMemberDirectory {
    async fn list_members(&self) -> Result<Vec<Member>> {
        let members = self.members.lock().unwrap();
        let mut all: Vec<Member> = members.values().cloned().collect();
        all.sort_by(|a, b| a.name.cmp(&b.name));
        Ok(all)
    }

    async fn find_by_id(&self, member_id: MemberId) -> Result<Option<Member>> {
        let members = self.members.lock().unwrap();
        Ok(members.get(&member_id).cloned())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_find_registered_member() {
        let directory = MemoryMemberDirectory::new();
        let member = Member {
            member_id: MemberId::new(),
            name: "Siti Rahma".to_string(),
            email: "siti@example.com".to_string(),
        };
        directory.add_member(member.clone());

        let found = directory.find_by_id(member.member_id).await.unwrap();
        assert_eq!(found, Some(member));
    }

    #[tokio::test]
    async fn test_find_unknown_member_returns_none() {
        let directory = MemoryMemberDirectory::new();
        let found = directory.find_by_id(MemberId::new()).await.unwrap();
        assert!(found.is_none());
    }

    #[tokio::test]
    async fn test_list_members_sorted_by_name() {
        let directory = MemoryMemberDirectory::new();
        for name in ["Budi", "Agus", "Citra"] {
            directory.add_member(Member {
                member_id: MemberId::new(),
                name: name.to_string(),
                email: format!("{}@example.com", name.to_lowercase()),
            });
        }

        let names: Vec<String> = directory
            .list_members()
            .await
            .unwrap()
            .into_iter()
            .map(|m| m.name)
            .collect();
        assert_eq!(names, vec!["Agus", "Budi", "Citra"]);
    }
}
