//! 家属成员管理
//!
//! 成员的类别和剂量限值是 (年龄, 是否怀孕, 标准) 的纯函数，只能通过修改这三者来间接改变。

use crate::dose_limits::{categorize, limit_for};
use hugtime_core::utils::generate_member_id;
use hugtime_core::{AgeCategory, DoseStandard, HugTimeError, Result};
use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;
use uuid::Uuid;

/// 表单录入的家属信息
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct FamilyMemberInput {
    pub name: String,
    pub age: u32,
    #[serde(default)]
    pub is_pregnant: bool,
}

/// 家属成员
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct FamilyMember {
    id: Uuid,
    name: String,
    age: u32,
    is_pregnant: bool,
    standard: DoseStandard,
    category: AgeCategory,
    dose_limit_msv: f64,
}

impl FamilyMember {
    /// 创建新成员，类别和限值随即推导
    pub fn new(name: impl Into<String>, age: u32, is_pregnant: bool, standard: DoseStandard) -> Self {
        Self::with_id(generate_member_id(), name, age, is_pregnant, standard)
    }

    /// 使用指定ID创建成员
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        age: u32,
        is_pregnant: bool,
        standard: DoseStandard,
    ) -> Self {
        let category = categorize(age, is_pregnant);
        Self {
            id,
            name: name.into(),
            age,
            is_pregnant,
            standard,
            category,
            dose_limit_msv: limit_for(standard, category),
        }
    }

    pub fn from_input(input: &FamilyMemberInput, standard: DoseStandard) -> Self {
        Self::new(input.name.clone(), input.age, input.is_pregnant, standard)
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> u32 {
        self.age
    }

    pub fn is_pregnant(&self) -> bool {
        self.is_pregnant
    }

    pub fn standard(&self) -> DoseStandard {
        self.standard
    }

    pub fn category(&self) -> AgeCategory {
        self.category
    }

    /// 剂量限值 (mSv)
    pub fn dose_limit_msv(&self) -> f64 {
        self.dose_limit_msv
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn set_age(&mut self, age: u32) {
        self.age = age;
        self.recompute();
    }

    pub fn set_pregnant(&mut self, is_pregnant: bool) {
        self.is_pregnant = is_pregnant;
        self.recompute();
    }

    pub fn apply_standard(&mut self, standard: DoseStandard) {
        self.standard = standard;
        self.recompute();
    }

    fn recompute(&mut self) {
        self.category = categorize(self.age, self.is_pregnant);
        self.dose_limit_msv = limit_for(self.standard, self.category);
    }
}

/// 家属名单
///
/// 持有当前选定的剂量标准，切换标准时所有成员的限值一并重算。
#[derive(Debug, Clone, Default)]
pub struct FamilyRoster {
    standard: DoseStandard,
    members: Vec<FamilyMember>,
}

impl FamilyRoster {
    pub fn new(standard: DoseStandard) -> Self {
        Self {
            standard,
            members: Vec::new(),
        }
    }

    /// 从表单录入批量创建
    pub fn from_inputs(inputs: &[FamilyMemberInput], standard: DoseStandard) -> Self {
        let mut roster = Self::new(standard);
        for input in inputs {
            roster.add(input);
        }
        roster
    }

    pub fn standard(&self) -> DoseStandard {
        self.standard
    }

    pub fn members(&self) -> &[FamilyMember] {
        &self.members
    }

    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }

    pub fn get(&self, member_id: Uuid) -> Option<&FamilyMember> {
        self.members.iter().find(|m| m.id == member_id)
    }

    /// 添加成员，返回其ID
    pub fn add(&mut self, input: &FamilyMemberInput) -> Uuid {
        let member = FamilyMember::from_input(input, self.standard);
        let id = member.id;
        tracing::debug!(
            "Added family member {} as {} ({} mSv)",
            id,
            member.category,
            member.dose_limit_msv
        );
        self.members.push(member);
        id
    }

    /// 删除成员
    pub fn remove(&mut self, member_id: Uuid) -> Result<FamilyMember> {
        let index = self.index_of(member_id)?;
        Ok(self.members.remove(index))
    }

    pub fn rename(&mut self, member_id: Uuid, name: impl Into<String>) -> Result<()> {
        let index = self.index_of(member_id)?;
        self.members[index].set_name(name);
        Ok(())
    }

    pub fn update_age(&mut self, member_id: Uuid, age: u32) -> Result<()> {
        let index = self.index_of(member_id)?;
        self.members[index].set_age(age);
        Ok(())
    }

    pub fn update_pregnancy(&mut self, member_id: Uuid, is_pregnant: bool) -> Result<()> {
        let index = self.index_of(member_id)?;
        self.members[index].set_pregnant(is_pregnant);
        Ok(())
    }

    /// 切换剂量标准并重算所有成员
    pub fn set_standard(&mut self, standard: DoseStandard) {
        if self.standard != standard {
            tracing::info!("Switching dose standard from {} to {}", self.standard, standard);
        }
        self.standard = standard;
        for member in &mut self.members {
            member.apply_standard(standard);
        }
    }

    /// 名单中出现的类别
    pub fn relevant_categories(&self) -> BTreeSet<AgeCategory> {
        self.members.iter().map(|m| m.category).collect()
    }

    fn index_of(&self, member_id: Uuid) -> Result<usize> {
        self.members
            .iter()
            .position(|m| m.id == member_id)
            .ok_or_else(|| HugTimeError::NotFound(format!("Family member {} not found", member_id)))
    }
}
