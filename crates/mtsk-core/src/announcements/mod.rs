use crate::domain::{Announcement, AnnouncementId, MoveDirection};

/// Stable ascending sort on `order`; ties keep snapshot order.
pub fn sort_announcements(announcements: &[Announcement]) -> Vec<Announcement> {
    let mut sorted = announcements.to_vec();
    sorted.sort_by_key(|announcement| announcement.order);
    sorted
}

/// Swaps the announcement with its neighbour and renumbers the whole list.
///
/// Moving the first entry up, the last entry down, or an unknown id returns the
/// list unchanged. Otherwise every `order` becomes its 0-based position.
pub fn move_announcement(
    announcements: &[Announcement],
    id: &AnnouncementId,
    direction: MoveDirection,
) -> Vec<Announcement> {
    let Some(current) = announcements.iter().position(|item| &item.id == id) else {
        return announcements.to_vec();
    };

    let target = match direction {
        MoveDirection::Up if current == 0 => return announcements.to_vec(),
        MoveDirection::Down if current + 1 == announcements.len() => {
            return announcements.to_vec()
        }
        MoveDirection::Up => current - 1,
        MoveDirection::Down => current + 1,
    };

    let mut reordered = announcements.to_vec();
    reordered.swap(current, target);
    for (index, announcement) in reordered.iter_mut().enumerate() {
        announcement.order = index as u32;
    }
    reordered
}

/// Write set the backend needs to persist a sequence's ordering.
pub fn order_updates(announcements: &[Announcement]) -> Vec<(AnnouncementId, u32)> {
    announcements
        .iter()
        .map(|announcement| (announcement.id.clone(), announcement.order))
        .collect()
}
