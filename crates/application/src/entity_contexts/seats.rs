use super::*;

impl ResourceContexts {
    /// Creates a pending seat for `user_id` in `team_id`.
    pub async fn invite_seat(
        &self,
        team_id: RecordId,
        user_id: RecordId,
        role_id: Option<RecordId>,
    ) -> bool {
        let seat = TeamUserSeat::invite(team_id, user_id, role_id);
        self.seats.add_item(team_id, Some(seat)).await
    }

    /// Approves a pending seat.
    pub async fn approve_seat(&self, seat: &TeamUserSeat) -> AppResult<bool> {
        self.save_seat_transition(seat, TeamUserSeat::approve).await
    }

    /// Suspends an active seat.
    pub async fn deactivate_seat(&self, seat: &TeamUserSeat) -> AppResult<bool> {
        self.save_seat_transition(seat, TeamUserSeat::deactivate)
            .await
    }

    /// Restores a suspended seat.
    pub async fn reactivate_seat(&self, seat: &TeamUserSeat) -> AppResult<bool> {
        self.save_seat_transition(seat, TeamUserSeat::reactivate)
            .await
    }

    /// Moves a seat to another role.
    pub async fn change_seat_role(&self, seat: &TeamUserSeat, role_id: RecordId) -> bool {
        let mut changed = seat.clone();
        changed.role_id = Some(role_id);
        self.seats.save_item_changes(&changed, seat.team_id).await
    }

    /// Resolves the permission keys `user_id` holds in `team_id`.
    ///
    /// Seats and roles are read in reply mode so the shared caches stay as
    /// the screens left them. Users without an active seat, or whose seat
    /// has no readable role, hold nothing.
    pub async fn seat_permissions(
        &self,
        team_id: RecordId,
        user_id: RecordId,
    ) -> AppResult<Vec<PermissionKey>> {
        let seats = self
            .seats
            .read_items_by_id(team_id, ListRead::reply())
            .await
            .ok_or_else(|| {
                AppError::Transport(format!("failed to read seats of team '{team_id}'"))
            })?;

        let Some(role_id) = seats
            .iter()
            .find(|seat| seat.user_id == user_id && seat.is_active())
            .and_then(|seat| seat.role_id)
        else {
            debug!(team_id = %team_id, user_id = %user_id, "no active seat with a role");
            return Ok(Vec::new());
        };

        match self.roles.read_item_by_id(role_id, true).await {
            Ok(ItemSlot::Loaded(role)) => Ok(role.permissions.keys().to_vec()),
            Ok(ItemSlot::NotLoaded | ItemSlot::NotFound) => Ok(Vec::new()),
            Err(error) => {
                warn!(
                    team_id = %team_id,
                    role_id = %role_id,
                    error = %error,
                    "failed to read seat role"
                );
                Ok(Vec::new())
            }
        }
    }

    /// Loads the signed-in user's permissions for `team_id` into the store.
    pub async fn load_session_permissions(
        &self,
        store: &SessionStore,
        team_id: RecordId,
    ) -> AppResult<usize> {
        let user = store
            .current_user()
            .await
            .ok_or_else(|| AppError::Unauthorized("no user is signed in".to_owned()))?;

        let permissions = self.seat_permissions(team_id, user.user_id()).await?;
        let count = permissions.len();
        store.set_seat_permissions(permissions).await;
        info!(team_id = %team_id, user_id = %user.user_id(), count, "seat permissions loaded");

        Ok(count)
    }

    async fn save_seat_transition(
        &self,
        seat: &TeamUserSeat,
        transition: fn(&mut TeamUserSeat) -> AppResult<()>,
    ) -> AppResult<bool> {
        let mut changed = seat.clone();
        transition(&mut changed)?;
        Ok(self.seats.save_item_changes(&changed, seat.team_id).await)
    }
}
