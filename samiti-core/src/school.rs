// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::keys::{SchoolId, StudentId};
use crate::record::{Collection, Record};

/// A school run by the organisation.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct School {
    pub id: SchoolId,
    pub name: String,
    pub teacher_name: String,
    pub teacher_phone: String,
    pub teacher_image: String,
    /// Founding year or date, as written by the organisation.
    pub established: String,
}

impl Record for School {
    const COLLECTION: Collection = Collection::Schools;

    type Key = SchoolId;

    fn key(&self) -> SchoolId {
        self.id
    }

    fn set_key(&mut self, key: SchoolId) {
        self.id = key;
    }
}

/// A student enrolled at one school.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Student {
    pub id: StudentId,
    #[serde(rename = "school_id")]
    pub school: SchoolId,
    pub name: String,
    pub father_name: String,
    pub mother_name: String,
    pub mobile: String,
    pub class_name: String,
    pub roll: String,
    pub image: String,
}

impl Student {
    /// Sort key for the class list: numeric rolls in numeric order, any others after them.
    pub fn roll_order(&self) -> (u64, &str) {
        let roll = self.roll.trim();
        (roll.parse().unwrap_or(u64::MAX), roll)
    }
}

impl Record for Student {
    const COLLECTION: Collection = Collection::Students;

    type Key = StudentId;

    fn key(&self) -> StudentId {
        self.id
    }

    fn set_key(&mut self, key: StudentId) {
        self.id = key;
    }
}
